//! Container endpoints.

use reqwest::StatusCode;

use dd_core::error::ClientResult;
use dd_models::Container;

use crate::client::DeploymentClient;
use crate::response::{map_response, ApiResult};

impl DeploymentClient {
    /// List all containers visible to the current token.
    pub async fn list_containers(&self) -> ClientResult<ApiResult<Vec<Container>>> {
        let response = self.get(&["containers"], &[]).await?;
        map_response(response, StatusCode::OK)
    }

    /// Get a single container by id.
    pub async fn get_container(&self, id: &str) -> ClientResult<ApiResult<Container>> {
        let response = self.get(&["containers", id], &[]).await?;
        map_response(response, StatusCode::OK)
    }
}
