//! Response capture and result mapping.
//!
//! Every exchange is captured as a status code plus the full body text, then
//! mapped against the single status the operation expects: a match decodes
//! the success type, anything else decodes the service's `Message`.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use dd_core::constants::SERVICE_NOT_ACCESSIBLE;
use dd_core::error::{ClientError, ClientResult};
use dd_models::Message;

/// Outcome of a service call: the decoded payload, or the service's message.
pub type ApiResult<T> = Result<T, Message>;

/// Status and body of one HTTP exchange.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    /// Drain a reqwest response into memory.
    pub async fn read(response: reqwest::Response) -> ClientResult<Self> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("failed to read response body: {e}")))?;
        Ok(Self { status, body })
    }

    pub fn decode<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            ClientError::Decode(format!(
                "unexpected body for status {}: {e}",
                self.status.as_u16()
            ))
        })
    }
}

/// Map a captured response to an `ApiResult` against the expected status.
///
/// `None` means the service could not be reached; it becomes the fixed
/// "service is not accessible" message without touching any body.
pub(crate) fn map_response<T: DeserializeOwned>(
    response: Option<RawResponse>,
    expected: StatusCode,
) -> ClientResult<ApiResult<T>> {
    let Some(response) = response else {
        return Ok(Err(Message::new(SERVICE_NOT_ACCESSIBLE)));
    };

    if response.status == expected {
        response.decode::<T>().map(Ok)
    } else {
        response.decode::<Message>().map(Err)
    }
}
