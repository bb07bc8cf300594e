//! Integration tests for token handling.
//!
//! Covers the boolean `authenticate` contract, the result-shaped `login`,
//! preservation of a prior token on failure, and `Authorization` header
//! injection on every request kind.

mod common;

use std::collections::HashMap;

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{
    authenticated_client, client_for, mount_domain_endpoints, unreachable_client,
    write_artifact, TEST_TOKEN,
};

// ---- authenticate ----

#[tokio::test]
async fn authenticate_stores_token_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/get-token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=s3cr%26t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.authenticate("alice", "s3cr&t").await.unwrap());
    assert_eq!(client.token().await.as_deref(), Some("abc"));
}

#[tokio::test]
async fn authenticate_returns_false_without_decoding_error_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/get-token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("<h1>Unauthorized</h1>"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.authenticate("alice", "wrong").await.unwrap());
    assert!(client.token().await.is_none());
}

#[tokio::test]
async fn failed_reauthentication_keeps_prior_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/get-token"))
        .and(body_string_contains("password=good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "first" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/get-token"))
        .and(body_string_contains("password=bad"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "invalid credentials" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.authenticate("alice", "good").await.unwrap());
    assert!(!client.authenticate("alice", "bad").await.unwrap());
    assert_eq!(client.token().await.as_deref(), Some("first"));
}

#[tokio::test]
async fn authenticate_against_unreachable_service_is_false() {
    let client = unreachable_client();
    assert!(!client.authenticate("alice", "secret").await.unwrap());
    assert!(client.token().await.is_none());
}

#[tokio::test]
async fn authenticate_with_malformed_token_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/get-token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("token=abc"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.authenticate("alice", "secret").await.unwrap_err();
    assert!(matches!(err, dd_core::ClientError::Decode(_)));
    assert!(client.token().await.is_none());
}

// ---- login ----

#[tokio::test]
async fn login_returns_service_message_on_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/get-token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "invalid credentials" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let message = client.login("alice", "wrong").await.unwrap().unwrap_err();
    assert_eq!(message.message, "invalid credentials");
    assert!(client.token().await.is_none());
}

#[tokio::test]
async fn login_returns_and_stores_token() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;
    let token = client.login("alice", "secret").await.unwrap().unwrap();
    assert_eq!(token.token, TEST_TOKEN);
    assert_eq!(client.token().await.as_deref(), Some(TEST_TOKEN));
}

// ---- Authorization header ----

#[tokio::test]
async fn unauthenticated_client_sends_no_authorization_header() {
    let server = MockServer::start().await;
    mount_domain_endpoints(&server).await;
    let (artifact, _dir) = write_artifact();

    let client = client_for(&server);
    assert!(client.get_heartbeat().await.unwrap());
    client.list_containers().await.unwrap().unwrap();
    client.get_container("c1").await.unwrap().unwrap();
    client
        .deploy_blueprint("c1", &artifact, &HashMap::new(), false)
        .await
        .unwrap()
        .unwrap();
    client.undeploy_blueprint("c1").await.unwrap().unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 5);
    for request in &requests {
        assert!(
            request.headers.get("authorization").is_none(),
            "{} {} carried an Authorization header",
            request.method,
            request.url
        );
    }
}

#[tokio::test]
async fn every_request_after_authenticate_carries_token() {
    let server = MockServer::start().await;
    mount_domain_endpoints(&server).await;
    let (artifact, _dir) = write_artifact();

    let client = authenticated_client(&server).await;
    assert!(client.get_heartbeat().await.unwrap());
    client.list_containers().await.unwrap().unwrap();
    client.get_container("c1").await.unwrap().unwrap();
    client
        .deploy_blueprint("c1", &artifact, &HashMap::new(), true)
        .await
        .unwrap()
        .unwrap();
    client.undeploy_blueprint("c1").await.unwrap().unwrap();

    let requests = server.received_requests().await.unwrap();
    // The first request is the token request itself.
    assert_eq!(requests.len(), 6);
    assert!(requests[0].headers.get("authorization").is_none());
    let expected = format!("Token {TEST_TOKEN}");
    for request in &requests[1..] {
        let value = request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok());
        assert_eq!(value, Some(expected.as_str()), "{} {}", request.method, request.url);
    }
}

#[tokio::test]
async fn token_set_externally_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/containers"))
        .and(header("authorization", "Token reused"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_token("reused").await;
    let containers = client.list_containers().await.unwrap().unwrap();
    assert!(containers.is_empty());
}

#[tokio::test]
async fn clones_share_the_token() {
    let server = MockServer::start().await;
    let client = authenticated_client(&server).await;
    let clone = client.clone();
    assert_eq!(clone.token().await.as_deref(), Some(TEST_TOKEN));
}
