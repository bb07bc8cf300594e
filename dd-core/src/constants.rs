//! Application-wide constants.

/// Application name.
pub const APP_NAME: &str = "DiceDeploy";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default connection timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Default socket (read) timeout in milliseconds.
pub const DEFAULT_SOCKET_TIMEOUT_MS: u64 = 60_000;

/// Message synthesized when the service could not be reached at all.
pub const SERVICE_NOT_ACCESSIBLE: &str = "service is not accessible";

/// Scheme prefix of the `Authorization` header value.
pub const AUTH_SCHEME: &str = "Token";

/// User agent sent with every request.
pub fn user_agent() -> String {
    format!(
        "dice-deploy/{APP_VERSION} ({})",
        crate::platform::Platform::current().name()
    )
}
