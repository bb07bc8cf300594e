//! Service liveness endpoint.

use reqwest::StatusCode;

use dd_core::error::ClientResult;

use crate::client::DeploymentClient;

impl DeploymentClient {
    /// Whether the service answers `GET /heartbeat` with 200.
    /// An unreachable service is reported as `false`.
    pub async fn get_heartbeat(&self) -> ClientResult<bool> {
        let response = self.get(&["heartbeat"], &[]).await?;
        Ok(response.is_some_and(|r| r.status == StatusCode::OK))
    }
}
