//! Authentication endpoint.

use reqwest::StatusCode;
use tracing::{debug, info};

use dd_core::error::ClientResult;
use dd_models::Token;

use crate::client::DeploymentClient;
use crate::response::{map_response, ApiResult, RawResponse};

const TOKEN_PATH: [&str; 2] = ["auth", "get-token"];

impl DeploymentClient {
    /// Obtain a token and store it for subsequent requests.
    ///
    /// Returns `true` only for HTTP 200 with a decodable token. Any other
    /// status, or an unreachable service, returns `false` and leaves a
    /// previously stored token in place; the error body is not inspected.
    /// Use [`DeploymentClient::login`] when the failure detail matters.
    pub async fn authenticate(&self, username: &str, password: &str) -> ClientResult<bool> {
        match self.request_token(username, password).await? {
            Some(response) if response.status == StatusCode::OK => {
                let token: Token = response.decode()?;
                self.set_token(token.token).await;
                info!("authenticated as {username}");
                Ok(true)
            }
            Some(response) => {
                debug!("authentication rejected with status {}", response.status.as_u16());
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Like [`DeploymentClient::authenticate`], but returns the token or the
    /// service's message. The token is stored on success only.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<ApiResult<Token>> {
        let response = self.request_token(username, password).await?;
        let result = map_response::<Token>(response, StatusCode::OK)?;
        if let Ok(ref token) = result {
            self.set_token(token.token.clone()).await;
            info!("authenticated as {username}");
        }
        Ok(result)
    }

    async fn request_token(
        &self,
        username: &str,
        password: &str,
    ) -> ClientResult<Option<RawResponse>> {
        let data = [("username", username), ("password", password)];
        self.post_form(&TOKEN_PATH, &[], &data).await
    }
}
