//! Heartbeat command - check whether the service is alive.

use std::process::ExitCode;
use std::time::Instant;

use console::style;

use dd_api::DeploymentClient;
use dd_core::error::ClientResult;

use crate::OutputFormat;

pub async fn run(client: &DeploymentClient, format: OutputFormat) -> ClientResult<ExitCode> {
    let start = Instant::now();
    let alive = client.get_heartbeat().await?;
    let latency_ms = start.elapsed().as_millis();

    match format {
        OutputFormat::Json => super::print_json(&serde_json::json!({
            "address": client.address().as_str(),
            "alive": alive,
            "latency_ms": latency_ms,
        })),
        OutputFormat::Text => {
            if alive {
                println!(
                    "{} {} is alive ({latency_ms}ms)",
                    style("OK").green().bold(),
                    client.address()
                );
            } else {
                println!("{} {} did not respond", style("FAIL").red().bold(), client.address());
            }
        }
    }

    Ok(if alive { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
