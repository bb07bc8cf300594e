//! DICE deployment client core - errors, configuration, and logging.
//!
//! This crate provides the shared foundation used by the other workspace crates:
//! - The fatal `ClientError` channel and its `ClientResult` alias
//! - TOML-backed application configuration (server address, TLS, credentials)
//! - Structured logging with tracing
//! - Platform directory lookup and common constants

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod constants;

// Re-export commonly used items at the crate root
pub use config::AppConfig;
pub use error::{ClientError, ClientResult};
pub use logging::init_logging;
pub use platform::Platform;
