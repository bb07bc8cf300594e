//! DICE deployment API - typed HTTP client for the deployment service.
//!
//! The client authenticates against the service, lists and inspects
//! containers, and uploads or removes blueprints. Every result-returning
//! operation yields `ClientResult<ApiResult<T>>`: the outer layer carries
//! fatal configuration/transport/decode failures, the inner layer carries
//! the service's own `Message` when a call is rejected or unreachable.

pub mod client;
pub mod endpoints;
pub mod response;
pub mod transport;

// Re-export key types
pub use client::DeploymentClient;
pub use response::ApiResult;
pub use transport::TransportSettings;
