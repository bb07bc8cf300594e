//! Blueprint (deployable artifact) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A blueprint deployed, or being deployed, into a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Blueprint {
    pub id: String,
    /// Deployment state reported by the service (e.g. "uploaded", "deployed").
    #[serde(default)]
    pub state_name: Option<String>,
    #[serde(default)]
    pub in_error: Option<bool>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
    /// Deployment outputs; the shape is defined by the blueprint itself.
    #[serde(default)]
    pub outputs: Option<serde_json::Value>,
}

impl Blueprint {
    /// Whether the service flagged this blueprint as failed.
    pub fn is_in_error(&self) -> bool {
        self.in_error.unwrap_or(false)
    }
}
