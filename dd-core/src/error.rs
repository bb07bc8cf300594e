//! Fatal error types for the DICE deployment client.
//!
//! `ClientError` is the channel for failures the client cannot recover from:
//! bad configuration, a broken transport, or a response that does not match
//! the declared wire types. Service-level rejections are not errors here; they
//! travel as the `Message` branch of an `ApiResult` in `dd-api`.

use thiserror::Error;

/// Convenience type alias for Results using ClientError.
pub type ClientResult<T> = Result<T, ClientError>;

/// Unrecoverable failures raised to the immediate caller.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid TLS/keystore setup, unusable address, or bad request parts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The transport failed after a response started, or the client is closed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response body could not be parsed as the declared type.
    #[error("decode error: {0}")]
    Decode(String),

    /// Local file system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(e: toml::de::Error) -> Self {
        ClientError::Configuration(e.to_string())
    }
}

impl ClientError {
    /// Whether this error originates from configuration rather than runtime.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ClientError::Configuration(_))
    }
}
