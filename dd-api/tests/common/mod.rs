//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use reqwest::Url;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dd_api::DeploymentClient;

/// Token issued by the mock auth endpoint.
pub const TEST_TOKEN: &str = "4f0a9c2e7b";

/// Create a client pointed at the mock server root.
pub fn client_for(server: &MockServer) -> DeploymentClient {
    client_at(&server.uri())
}

/// Create a client for an arbitrary base address.
pub fn client_at(address: &str) -> DeploymentClient {
    let url = Url::parse(address).expect("invalid test address");
    DeploymentClient::with_default_timeouts(url, None, None).expect("failed to build client")
}

/// A client whose address refuses connections.
pub fn unreachable_client() -> DeploymentClient {
    client_at("http://127.0.0.1:1")
}

/// Mount a token endpoint that accepts any credentials.
pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/get-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": TEST_TOKEN })))
        .mount(server)
        .await;
}

/// Create a client that has already authenticated against the mock server.
pub async fn authenticated_client(server: &MockServer) -> DeploymentClient {
    mount_token_endpoint(server).await;
    let client = client_for(server);
    assert!(client.authenticate("alice", "secret").await.expect("authenticate failed"));
    client
}

/// Write a small blueprint archive to a temporary directory.
/// Returns the file path and the TempDir (must be held alive for the test).
pub fn write_artifact() -> (PathBuf, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().join("webapp.tar.gz");
    std::fs::write(&path, b"\x1f\x8bblueprint-archive").expect("failed to write artifact");
    (path, dir)
}

/// Mount happy-path responses for every domain endpoint of container `c1`.
pub async fn mount_domain_endpoints(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/heartbeat"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/containers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "c1" }])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/containers/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "c1" })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/containers/c1/blueprint"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "id": "b1" })))
        .mount(server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/containers/c1/blueprint"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "id": "b1" })))
        .mount(server)
        .await;
}
