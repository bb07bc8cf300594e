//! Container commands.

use std::process::ExitCode;

use clap::Subcommand;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, ContentArrangement, Table};
use console::style;

use dd_api::DeploymentClient;
use dd_core::error::ClientResult;
use dd_models::{Blueprint, Container};

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ContainersAction {
    /// List all containers.
    List,
    /// Show details for a specific container.
    Get {
        /// Container id.
        id: String,
    },
}

pub async fn run(
    client: &DeploymentClient,
    action: ContainersAction,
    format: OutputFormat,
) -> ClientResult<ExitCode> {
    match action {
        ContainersAction::List => {
            let containers = match client.list_containers().await? {
                Ok(containers) => containers,
                Err(message) => return Ok(super::report_message(&message, format)),
            };

            match format {
                OutputFormat::Json => super::print_json(&containers),
                OutputFormat::Text => {
                    if containers.is_empty() {
                        println!("No containers found.");
                    } else {
                        println!("{}", container_table(&containers));
                        println!("\n{} container(s)", containers.len());
                    }
                }
            }
        }
        ContainersAction::Get { id } => {
            let container = match client.get_container(&id).await? {
                Ok(container) => container,
                Err(message) => return Ok(super::report_message(&message, format)),
            };

            match format {
                OutputFormat::Json => super::print_json(&container),
                OutputFormat::Text => print_container(&container),
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn container_table(containers: &[Container]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec!["Container", "Description", "Blueprint", "State", "Modified"]);

    for c in containers {
        let description = super::truncate(c.description.as_deref().unwrap_or("-"), 40);
        let (blueprint, state) = match c.blueprint {
            Some(ref bp) => (bp.id.clone(), state_label(bp)),
            None => ("-".to_string(), "empty".to_string()),
        };
        let modified = c
            .modified_date
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![c.id.clone(), description, blueprint, state, modified]);
    }
    table
}

fn state_label(bp: &Blueprint) -> String {
    let state = bp.state_name.as_deref().unwrap_or("unknown");
    if bp.is_in_error() {
        format!("{state} (error)")
    } else {
        state.to_string()
    }
}

fn print_container(c: &Container) {
    println!("{}", style(format!("Container {}", c.id)).bold().underlined());
    println!("  Description: {}", c.description.as_deref().unwrap_or("-"));
    if let Some(modified) = c.modified_date {
        println!("  Modified:    {}", modified.to_rfc3339());
    }
    match c.blueprint {
        Some(ref bp) => {
            println!("  Blueprint:   {}", bp.id);
            let label = state_label(bp);
            if bp.is_in_error() {
                println!("  State:       {}", style(label).red());
            } else {
                println!("  State:       {}", style(label).green());
            }
            if let Some(ref outputs) = bp.outputs {
                println!("  Outputs:");
                println!(
                    "{}",
                    serde_json::to_string_pretty(outputs).unwrap_or_default()
                );
            }
        }
        None => println!("  Blueprint:   {}", style("none").dim()),
    }
}
