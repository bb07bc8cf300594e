//! DICE deployment CLI - command-line interface for the deployment service.
//!
//! Checks service liveness, lists and inspects containers, and deploys or
//! removes blueprints. Connection settings come from the config file and can
//! be overridden per invocation.

mod commands;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use console::style;
use tracing::{debug, error, warn};

use dd_core::config::AppConfig;
use dd_core::constants::APP_VERSION;
use dd_core::error::ClientResult;
use dd_core::logging;

/// dice-deploy - manage blueprint deployments on a DICE deployment service.
#[derive(Parser)]
#[command(
    name = "dice-deploy",
    version,
    about = "DICE deployment service CLI",
    long_about = "A command-line interface for the DICE deployment service.\n\
                  Inspect containers and deploy or undeploy blueprints from the terminal."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Service address (overrides config).
    #[arg(short, long, global = true)]
    address: Option<String>,

    /// Username to authenticate with (overrides config).
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Password to authenticate with (overrides config; prompted if missing).
    #[arg(short, long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the service is alive.
    Heartbeat,
    /// List and inspect containers.
    Containers {
        #[command(subcommand)]
        action: commands::containers::ContainersAction,
    },
    /// Upload a blueprint into a container and deploy it.
    Deploy {
        /// Target container id.
        container: String,
        /// Blueprint archive or YAML file to upload.
        file: PathBuf,
        /// Metadata entry sent with the upload (repeatable).
        #[arg(short, long = "meta", value_name = "KEY=VALUE", value_parser = commands::parse_key_value)]
        metadata: Vec<(String, String)>,
        /// Also register the application with the service.
        #[arg(long)]
        register: bool,
    },
    /// Remove the blueprint deployed in a container.
    Undeploy {
        /// Target container id.
        container: String,
    },
    /// Inspect or create the configuration file.
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => AppConfig::default_config_path().unwrap_or_else(|_| PathBuf::from("config.toml")),
    };

    let mut config = match load_config(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", style("error:").red().bold());
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let level = if cli.verbose { "debug".to_string() } else { config.logging.level.clone() };
    let _guard = match config
        .effective_log_dir()
        .and_then(|dir| logging::init_logging(&level, &dir, config.logging.json_output))
    {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::init_console_logging(&level);
            warn!("file logging unavailable: {e}");
            None
        }
    };

    debug!("dice-deploy v{APP_VERSION}, config {}", config_path.display());

    apply_overrides(&mut config, &cli);

    match run(cli, config, &config_path).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            eprintln!("{} {e}", style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &Path) -> ClientResult<AppConfig> {
    if path.exists() {
        AppConfig::load_from_file(path)
    } else {
        Ok(AppConfig::default())
    }
}

/// Command-line flags take precedence over the config file.
fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(ref address) = cli.address {
        config.server.address = AppConfig::sanitize_server_address(address);
    }
    if let Some(ref username) = cli.username {
        config.credentials.username = username.clone();
    }
    if let Some(ref password) = cli.password {
        config.credentials.password = password.clone();
    }
}

async fn run(cli: Cli, config: AppConfig, config_path: &Path) -> ClientResult<ExitCode> {
    if let Commands::Config { action } = cli.command {
        return commands::config::run(&config, config_path, action, cli.format);
    }

    let Some(client) = commands::connect(&config).await? else {
        return Ok(ExitCode::FAILURE);
    };

    let code = match cli.command {
        Commands::Heartbeat => commands::heartbeat::run(&client, cli.format).await,
        Commands::Containers { action } => {
            commands::containers::run(&client, action, cli.format).await
        }
        Commands::Deploy { container, file, metadata, register } => {
            let metadata: HashMap<String, String> = metadata.into_iter().collect();
            commands::deploy::deploy(&client, &container, &file, &metadata, register, cli.format)
                .await
        }
        Commands::Undeploy { container } => {
            commands::deploy::undeploy(&client, &container, cli.format).await
        }
        Commands::Config { .. } => Ok(ExitCode::SUCCESS),
    };

    client.close().await;
    code
}
