//! Container (deployment target) model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::blueprint::Blueprint;

/// A deployment target managed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Container {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
    /// The blueprint currently deployed into this container, if any.
    #[serde(default)]
    pub blueprint: Option<Blueprint>,
}

impl Container {
    pub fn is_empty(&self) -> bool {
        self.blueprint.is_none()
    }
}
