//! API endpoint modules organized by resource.
//!
//! Each module adds typed methods on `DeploymentClient` for one group of
//! related service endpoints.

pub mod auth;
pub mod heartbeat;
pub mod containers;
pub mod blueprints;
