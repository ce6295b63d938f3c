//! Gateway router tests that never reach a live upstream.

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use std::sync::Arc;

use kubegate_types::{GatewayConfig, SecretShortcutConfig, SecretString};

use crate::proxy::{build_gateway_router, GatewayState};

/// Address with nothing listening on it.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

fn test_config() -> GatewayConfig {
    GatewayConfig {
        upstream_base_url: closed_port_url(),
        bearer_token: SecretString::new("unit-test-token"),
        request_timeout_secs: 5,
        connect_timeout_secs: 2,
        max_body_bytes: 64,
        ..GatewayConfig::default()
    }
}

fn server(config: &GatewayConfig) -> axum_test::TestServer {
    let state = GatewayState::from_config(config).expect("valid test config");
    axum_test::TestServer::new(build_gateway_router(Arc::new(state))).expect("test server")
}

#[tokio::test]
async fn test_unmatched_paths_are_404() {
    let server = server(&test_config());

    for path in ["/", "/healthz", "/apix/v1", "/API/v1", "/v1/api"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{}", path);

        let json: serde_json::Value = response.json();
        assert_eq!(json["error"]["code"], 404);
    }
}

#[tokio::test]
async fn test_create_secret_is_404_when_disabled() {
    let server = server(&test_config());

    let response = server.post("/create-secret").text("{}").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_declared_oversize_body_is_413() {
    let server = server(&test_config());

    let response = server
        .post("/api/v1/namespaces/default/secrets")
        .add_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .bytes(vec![b'x'; 65].into())
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_refused_upstream_is_502_without_secrets() {
    let config = test_config();
    let server = server(&config);

    let response = server
        .get("/api/v1/namespaces/default/pods")
        .add_header(HeaderName::from_static("x-trace-tag"), HeaderValue::from_static("1"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    let body = response.text();
    assert!(!body.contains("unit-test-token"));
    assert!(!body.contains(&config.upstream_base_url));
}

#[tokio::test]
async fn test_create_secret_forwards_when_enabled() {
    let config = GatewayConfig {
        secret_shortcut: Some(SecretShortcutConfig { namespace: "my-namespace".to_string() }),
        ..test_config()
    };
    let server = server(&config);

    // Reaches the (closed) upstream instead of answering 404 locally.
    let response = server.post("/create-secret").text("{}").await;
    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
}

#[test]
fn test_missing_token_fails_fast() {
    let config = GatewayConfig { bearer_token: SecretString::default(), ..test_config() };
    assert!(GatewayState::from_config(&config).is_err());
}

#[test]
fn test_missing_upstream_fails_fast() {
    let config = GatewayConfig { upstream_base_url: "  ".to_string(), ..test_config() };
    assert!(GatewayState::from_config(&config).is_err());
}
