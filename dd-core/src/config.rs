//! Application configuration management.
//!
//! Handles loading, saving, and accessing the client configuration: service
//! address, connection timeouts, TLS trust material, stored credentials, and
//! logging preferences. Configuration is persisted as TOML on disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_SOCKET_TIMEOUT_MS};
use crate::error::{ClientError, ClientResult};
use crate::platform::Platform;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Service connection settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Credentials used to obtain a token.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Service connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base address of the deployment service (e.g., "https://dice.example.com/api").
    #[serde(default)]
    pub address: String,

    /// Connection establishment timeout in milliseconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Socket read timeout in milliseconds.
    #[serde(default = "default_socket_timeout")]
    pub socket_timeout_ms: u64,

    /// Path to the trust store. Empty disables custom trust.
    #[serde(default)]
    pub keystore_path: String,

    /// Keystore password. When set the store is read as PKCS#12, otherwise
    /// as an unencrypted PEM or DER file.
    #[serde(default)]
    pub keystore_password: String,

    /// Lowest TLS protocol version accepted.
    #[serde(default = "default_min_tls")]
    pub min_tls_version: TlsProtocol,

    /// Highest TLS protocol version accepted.
    #[serde(default = "default_max_tls")]
    pub max_tls_version: TlsProtocol,
}

/// A TLS protocol version as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TlsProtocol {
    #[serde(rename = "1.0")]
    Tls10,
    #[serde(rename = "1.1")]
    Tls11,
    #[serde(rename = "1.2")]
    Tls12,
    #[serde(rename = "1.3")]
    Tls13,
}

/// Stored credentials. Empty values mean "not configured".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

fn default_socket_timeout() -> u64 {
    DEFAULT_SOCKET_TIMEOUT_MS
}

fn default_min_tls() -> TlsProtocol {
    TlsProtocol::Tls12
}

fn default_max_tls() -> TlsProtocol {
    TlsProtocol::Tls13
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            connect_timeout_ms: default_connect_timeout(),
            socket_timeout_ms: default_socket_timeout(),
            keystore_path: String::new(),
            keystore_password: String::new(),
            min_tls_version: default_min_tls(),
            max_tls_version: default_max_tls(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl ServerConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_timeout_ms)
    }

    /// The keystore path, if one is configured.
    pub fn keystore(&self) -> Option<&Path> {
        let trimmed = self.keystore_path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Path::new(trimmed))
        }
    }

    /// The keystore password, if one is configured.
    pub fn keystore_password(&self) -> Option<&str> {
        if self.keystore_password.is_empty() {
            None
        } else {
            Some(&self.keystore_password)
        }
    }
}

impl std::fmt::Display for TlsProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let v = match self {
            TlsProtocol::Tls10 => "1.0",
            TlsProtocol::Tls11 => "1.1",
            TlsProtocol::Tls12 => "1.2",
            TlsProtocol::Tls13 => "1.3",
        };
        write!(f, "TLSv{v}")
    }
}

impl CredentialsConfig {
    pub fn username(&self) -> Option<&str> {
        Some(self.username.trim()).filter(|u| !u.is_empty())
    }

    pub fn password(&self) -> Option<&str> {
        Some(self.password.as_str()).filter(|p| !p.is_empty())
    }
}

impl AppConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> ClientResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ClientError::Configuration(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> ClientResult<PathBuf> {
        Ok(Platform::config_dir()?.join("config.toml"))
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> ClientResult<PathBuf> {
        if self.logging.directory.is_empty() {
            Ok(Platform::data_dir()?.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Check whether a service address is configured.
    pub fn is_server_configured(&self) -> bool {
        !self.server.address.trim().is_empty()
    }

    /// Sanitize and normalize a service address.
    ///
    /// Strips whitespace and quotes, adds `http://` when no scheme is given,
    /// and drops trailing slashes so operation paths append cleanly.
    pub fn sanitize_server_address(address: &str) -> String {
        let trimmed = address.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let with_scheme = if has_http_scheme(trimmed) {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };

        with_scheme.trim_end_matches('/').to_string()
    }
}

fn has_http_scheme(address: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        address
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.connect_timeout_ms, 5_000);
        assert_eq!(config.server.socket_timeout_ms, 60_000);
        assert_eq!(config.server.min_tls_version, TlsProtocol::Tls12);
        assert_eq!(config.server.max_tls_version, TlsProtocol::Tls13);
        assert!(config.server.keystore().is_none());
        assert!(config.credentials.username().is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.is_server_configured());
    }

    #[test]
    fn test_sanitize_server_address() {
        assert_eq!(
            AppConfig::sanitize_server_address("dice.example.com/api/"),
            "http://dice.example.com/api"
        );
        assert_eq!(
            AppConfig::sanitize_server_address("  \"https://svc.test/\"  "),
            "https://svc.test"
        );
        assert_eq!(AppConfig::sanitize_server_address("   "), "");
    }

    #[test]
    fn test_sanitize_server_address_scheme_is_case_insensitive() {
        assert_eq!(
            AppConfig::sanitize_server_address("HTTPS://svc.test/"),
            "HTTPS://svc.test"
        );
        assert_eq!(
            AppConfig::sanitize_server_address("Http://svc.test:8080"),
            "Http://svc.test:8080"
        );
        assert_eq!(
            AppConfig::sanitize_server_address("httpsvc.test"),
            "http://httpsvc.test"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            address = "https://svc.test"
            keystore_path = "/etc/dice/trust.pem"
            min_tls_version = "1.3"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.connect_timeout(), Duration::from_millis(5_000));
        assert_eq!(config.server.keystore(), Some(Path::new("/etc/dice/trust.pem")));
        assert_eq!(config.server.min_tls_version, TlsProtocol::Tls13);
        assert!(config.server.keystore_password().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.server.address = "https://svc.test".into();
        config.credentials.username = "deployer".into();
        config.save_to_file(&path).unwrap();

        let reloaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(reloaded.server.address, "https://svc.test");
        assert_eq!(reloaded.credentials.username(), Some("deployer"));
        assert!(reloaded.credentials.password().is_none());
    }

    #[test]
    fn test_bad_toml_is_configuration_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\naddress = 1").unwrap();
        let err = AppConfig::load_from_file(&path).unwrap_err();
        assert!(err.is_configuration());
    }
}
