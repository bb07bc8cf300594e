//! CLI command implementations.

pub mod config;
pub mod containers;
pub mod deploy;
pub mod heartbeat;

use std::process::ExitCode;

use console::style;
use dialoguer::Password;
use serde::Serialize;
use tracing::debug;

use dd_api::DeploymentClient;
use dd_core::config::AppConfig;
use dd_core::error::{ClientError, ClientResult};
use dd_models::Message;

use crate::OutputFormat;

/// Build a client from config and authenticate when a username is known.
///
/// Returns `None` after reporting the failure if authentication is rejected.
pub async fn connect(config: &AppConfig) -> ClientResult<Option<DeploymentClient>> {
    let client = DeploymentClient::from_config(&config.server)?;

    let Some(username) = config.credentials.username() else {
        debug!("no username configured, continuing unauthenticated");
        return Ok(Some(client));
    };

    let password = match config.credentials.password() {
        Some(p) => p.to_string(),
        None => Password::new()
            .with_prompt(format!("Password for {username}"))
            .interact()
            .map_err(|e| ClientError::Configuration(format!("failed to read password: {e}")))?,
    };

    if client.authenticate(username, &password).await? {
        Ok(Some(client))
    } else {
        eprintln!(
            "{} Authentication as {username} failed.",
            style("FAIL").red().bold()
        );
        client.close().await;
        Ok(None)
    }
}

/// Report a service-side rejection and return a failing exit code.
pub fn report_message(message: &Message, format: OutputFormat) -> ExitCode {
    match format {
        OutputFormat::Json => print_json(message),
        OutputFormat::Text => eprintln!("{} {}", style("FAIL").red().bold(), message),
    }
    ExitCode::FAILURE
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Parse a `KEY=VALUE` metadata argument.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in `{s}`"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

/// Truncate a string to a maximum number of characters, appending an
/// ellipsis if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
