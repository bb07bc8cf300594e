//! HTTP client for the DICE deployment service REST API.
//!
//! Owns the transport, the base address, and the bearer token. Builds
//! request URIs, injects the `Authorization` header, and executes requests,
//! turning transport failures into an absent response for result mapping.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder, Url};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use dd_core::config::{AppConfig, ServerConfig};
use dd_core::constants::AUTH_SCHEME;
use dd_core::error::{ClientError, ClientResult};

use crate::response::RawResponse;
use crate::transport::{build_transport, TransportSettings};

/// Client for the deployment service.
///
/// Clones share the transport and the token. A request reads the token once,
/// when it is built; `authenticate` on one clone is visible to all of them.
#[derive(Clone)]
pub struct DeploymentClient {
    /// `None` once the client has been closed.
    transport: Arc<RwLock<Option<Client>>>,
    /// Base address; operation paths are appended to its path.
    address: Url,
    /// Bearer token from the last successful authentication.
    token: Arc<RwLock<Option<String>>>,
}

impl DeploymentClient {
    /// Create a client with explicit timeouts and an optional keystore.
    ///
    /// Any keystore failure is a `ClientError::Configuration`; no client is
    /// returned in that case.
    pub fn new(
        address: Url,
        connect_timeout: Duration,
        socket_timeout: Duration,
        keystore: Option<&Path>,
        keystore_password: Option<&str>,
    ) -> ClientResult<Self> {
        let settings = TransportSettings {
            connect_timeout,
            socket_timeout,
            ..TransportSettings::default()
        }
        .with_keystore(keystore, keystore_password);
        Self::with_settings(address, &settings)
    }

    /// Create a client with the default 5 s connect and 60 s socket timeouts.
    pub fn with_default_timeouts(
        address: Url,
        keystore: Option<&Path>,
        keystore_password: Option<&str>,
    ) -> ClientResult<Self> {
        let settings = TransportSettings::default().with_keystore(keystore, keystore_password);
        Self::with_settings(address, &settings)
    }

    /// Create a client from the `[server]` config section.
    pub fn from_config(config: &ServerConfig) -> ClientResult<Self> {
        let sanitized = AppConfig::sanitize_server_address(&config.address);
        if sanitized.is_empty() {
            return Err(ClientError::Configuration("no service address configured".into()));
        }
        let address = Url::parse(&sanitized).map_err(|e| {
            ClientError::Configuration(format!("invalid service address {sanitized}: {e}"))
        })?;
        Self::with_settings(address, &TransportSettings::from_config(config))
    }

    /// Create a client from fully specified transport settings.
    pub fn with_settings(address: Url, settings: &TransportSettings) -> ClientResult<Self> {
        if address.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "service address cannot carry a path: {address}"
            )));
        }
        let inner = build_transport(settings)?;
        debug!("deployment client created for {address}");

        Ok(Self {
            transport: Arc::new(RwLock::new(Some(inner))),
            address,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// The base address of the service.
    pub fn address(&self) -> &Url {
        &self.address
    }

    /// The currently stored token, if any.
    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Use a token obtained elsewhere for subsequent requests.
    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Release the transport. Idempotent; later requests fail with
    /// `ClientError::Transport`.
    pub async fn close(&self) {
        if self.transport.write().await.take().is_some() {
            debug!("deployment client for {} closed", self.address);
        }
    }

    /// Whether `close` has been called on this client or any clone of it.
    pub async fn is_closed(&self) -> bool {
        self.transport.read().await.is_none()
    }

    /// Append `segments` to the base address path, each percent-encoded as
    /// a single segment, and add `params` as query pairs.
    pub(crate) fn build_uri(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> ClientResult<Url> {
        if let Some(segment) = segments.iter().find(|s| is_dot_segment(s)) {
            return Err(ClientError::Configuration(format!(
                "path segment {segment:?} is not a valid identifier"
            )));
        }

        let mut url = self.address.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Configuration(format!(
                    "service address cannot carry a path: {}",
                    self.address
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn transport(&self) -> ClientResult<Client> {
        self.transport
            .read()
            .await
            .clone()
            .ok_or_else(|| ClientError::Transport("client has been closed".into()))
    }

    /// Add `Authorization: Token <token>` when a token is stored.
    async fn apply_auth(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => builder.header(AUTHORIZATION, format!("{AUTH_SCHEME} {token}")),
            None => builder,
        }
    }

    /// Start a request for `method` on `url`, auth applied.
    async fn request(&self, method: Method, url: Url) -> ClientResult<RequestBuilder> {
        let builder = self.transport().await?.request(method, url);
        Ok(self.apply_auth(builder).await)
    }

    /// Send a request. Network failures yield `Ok(None)`.
    async fn execute(
        &self,
        method: &Method,
        url: &Url,
        builder: RequestBuilder,
    ) -> ClientResult<Option<RawResponse>> {
        let path = url.path();
        debug!("{method} {path}");
        match builder.send().await {
            Ok(response) => {
                let raw = RawResponse::read(response).await?;
                debug!("{method} {path} -> {}", raw.status.as_u16());
                Ok(Some(raw))
            }
            Err(e) if e.is_builder() => Err(ClientError::Configuration(format!(
                "invalid request {method} {path}: {e}"
            ))),
            Err(e) => {
                warn!("{method} {path} failed: {}", describe_failure(&e));
                Ok(None)
            }
        }
    }

    // --- Request helpers ---

    pub(crate) async fn get(
        &self,
        path: &[&str],
        params: &[(&str, &str)],
    ) -> ClientResult<Option<RawResponse>> {
        let url = self.build_uri(path, params)?;
        let builder = self.request(Method::GET, url.clone()).await?;
        self.execute(&Method::GET, &url, builder).await
    }

    /// POST a string map as form parameters.
    pub(crate) async fn post_form(
        &self,
        path: &[&str],
        params: &[(&str, &str)],
        data: &[(&str, &str)],
    ) -> ClientResult<Option<RawResponse>> {
        let url = self.build_uri(path, params)?;
        let builder = self.request(Method::POST, url.clone()).await?.form(data);
        self.execute(&Method::POST, &url, builder).await
    }

    /// POST a multipart form. Forms are consumed by sending.
    pub(crate) async fn post_multipart(
        &self,
        path: &[&str],
        params: &[(&str, &str)],
        form: reqwest::multipart::Form,
    ) -> ClientResult<Option<RawResponse>> {
        let url = self.build_uri(path, params)?;
        let builder = self.request(Method::POST, url.clone()).await?.multipart(form);
        self.execute(&Method::POST, &url, builder).await
    }

    pub(crate) async fn delete(
        &self,
        path: &[&str],
        params: &[(&str, &str)],
    ) -> ClientResult<Option<RawResponse>> {
        let url = self.build_uri(path, params)?;
        let builder = self.request(Method::DELETE, url.clone()).await?;
        self.execute(&Method::DELETE, &url, builder).await
    }
}

impl std::fmt::Debug for DeploymentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentClient")
            .field("address", &self.address.as_str())
            .finish_non_exhaustive()
    }
}

/// Classify a reqwest send failure for logging.
fn describe_failure(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    }
}

/// `.` and `..` in any spelling the URL parser resolves as a dot segment.
fn is_dot_segment(segment: &str) -> bool {
    let normalized = segment.to_ascii_lowercase().replace("%2e", ".");
    normalized == "." || normalized == ".."
}
