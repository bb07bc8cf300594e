//! Deploy and undeploy commands.

use std::collections::HashMap;
use std::path::Path;
use std::process::ExitCode;

use console::style;

use dd_api::DeploymentClient;
use dd_core::error::ClientResult;
use dd_models::Blueprint;

use crate::OutputFormat;

pub async fn deploy(
    client: &DeploymentClient,
    container: &str,
    file: &Path,
    metadata: &HashMap<String, String>,
    register: bool,
    format: OutputFormat,
) -> ClientResult<ExitCode> {
    if let OutputFormat::Text = format {
        println!(
            "Uploading {} to container {container}...",
            file.display()
        );
    }

    match client.deploy_blueprint(container, file, metadata, register).await? {
        Ok(blueprint) => {
            report_accepted("Deployment", container, &blueprint, format);
            Ok(ExitCode::SUCCESS)
        }
        Err(message) => Ok(super::report_message(&message, format)),
    }
}

pub async fn undeploy(
    client: &DeploymentClient,
    container: &str,
    format: OutputFormat,
) -> ClientResult<ExitCode> {
    match client.undeploy_blueprint(container).await? {
        Ok(blueprint) => {
            report_accepted("Undeployment", container, &blueprint, format);
            Ok(ExitCode::SUCCESS)
        }
        Err(message) => Ok(super::report_message(&message, format)),
    }
}

fn report_accepted(what: &str, container: &str, blueprint: &Blueprint, format: OutputFormat) {
    match format {
        OutputFormat::Json => super::print_json(blueprint),
        OutputFormat::Text => {
            println!(
                "  {} {what} of blueprint {} accepted for container {container}.",
                style("OK").green().bold(),
                blueprint.id
            );
            if let Some(ref state) = blueprint.state_name {
                println!("  State: {state}");
            }
        }
    }
}
