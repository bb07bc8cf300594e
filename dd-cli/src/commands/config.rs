//! Config commands - show the effective configuration or write a default one.

use std::path::Path;
use std::process::ExitCode;

use clap::Subcommand;
use console::style;

use dd_core::config::AppConfig;
use dd_core::error::{ClientError, ClientResult};

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (passwords masked).
    Show,
    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn run(
    config: &AppConfig,
    path: &Path,
    action: ConfigAction,
    format: OutputFormat,
) -> ClientResult<ExitCode> {
    match action {
        ConfigAction::Show => {
            let masked = masked(config);
            match format {
                OutputFormat::Json => super::print_json(&masked),
                OutputFormat::Text => {
                    println!("{}", style(format!("# {}", path.display())).dim());
                    let text = toml::to_string_pretty(&masked).map_err(|e| {
                        ClientError::Configuration(format!("failed to serialize config: {e}"))
                    })?;
                    println!("{text}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                eprintln!(
                    "{} {} already exists (use --force to overwrite).",
                    style("FAIL").red().bold(),
                    path.display()
                );
                return Ok(ExitCode::FAILURE);
            }
            AppConfig::default().save_to_file(path)?;
            println!("  {} Config written to {}", style("OK").green(), path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Copy of the config with secrets replaced.
fn masked(config: &AppConfig) -> AppConfig {
    let mut copy = config.clone();
    if !copy.credentials.password.is_empty() {
        copy.credentials.password = "********".into();
    }
    if !copy.server.keystore_password.is_empty() {
        copy.server.keystore_password = "********".into();
    }
    copy
}
