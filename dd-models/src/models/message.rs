//! Structured error/informational payload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The service's `{ "message": ... }` payload.
///
/// Returned as the error branch of every result-returning client operation,
/// either decoded from a rejected response or synthesized locally when the
/// service cannot be reached.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[error("{message}")]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
