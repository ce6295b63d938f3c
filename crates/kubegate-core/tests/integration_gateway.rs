#![allow(unused_crate_dependencies)]
#![allow(clippy::tests_outside_test_module, reason = "integration tests live in tests/ dir")]
#![allow(clippy::expect_used, reason = "integration test: panics are the assertion mechanism")]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use kubegate_core::{build_gateway_router, GatewayState};
use kubegate_types::{GatewayConfig, SecretShortcutConfig, SecretString, Sentinel, SentinelData, SentinelSpec};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use wiremock::matchers::{any, body_bytes, header as header_eq, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "integration-sa-token";
const GROUP: &str = "secops.example.com";

fn config_for(upstream: &str) -> GatewayConfig {
    GatewayConfig {
        upstream_base_url: upstream.to_string(),
        bearer_token: SecretString::new(TOKEN),
        service_account: Some("secops-console".to_string()),
        request_timeout_secs: 2,
        connect_timeout_secs: 1,
        max_body_bytes: 1024,
        custom_groups: vec![GROUP.to_string()],
        ..GatewayConfig::default()
    }
}

fn gateway(config: &GatewayConfig) -> TestServer {
    let state = GatewayState::from_config(config).expect("valid test config");
    TestServer::new(build_gateway_router(Arc::new(state))).expect("test server")
}

/// Serve the gateway on a real socket so request targets reach it unnormalized.
async fn serve_gateway(config: &GatewayConfig) -> SocketAddr {
    let state = GatewayState::from_config(config).expect("valid test config");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind gateway");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, build_gateway_router(Arc::new(state))).await;
    });
    addr
}

/// Send one raw HTTP/1.1 request and return everything the gateway wrote back.
async fn raw_exchange(addr: SocketAddr, target: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect gateway");
    let request = format!("GET {} HTTP/1.1\r\nHost: gateway\r\nConnection: close\r\n\r\n", target);
    stream.write_all(request.as_bytes()).await.expect("write request");
    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("gateway answered")
        .expect("read response");
    String::from_utf8_lossy(&response).into_owned()
}

fn sentinel() -> Sentinel {
    Sentinel::new(
        GROUP,
        "db-password",
        SentinelSpec {
            secret_name: "db-password".to_string(),
            data: SentinelData { password: "hunter2".to_string() },
            secret_type: "Opaque".to_string(),
            service_account: "app".to_string(),
            role: "app-reader".to_string(),
            role_binding: "app-reader-binding".to_string(),
        },
    )
}

#[tokio::test]
async fn test_path_and_query_forwarded_unchanged() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/apis/apps/v1/namespaces/default/deployments"))
        .and(query_param("labelSelector", "app=web"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"kind": "DeploymentList"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = gateway(&config_for(&upstream.uri()))
        .get("/apis/apps/v1/namespaces/default/deployments?labelSelector=app%3Dweb&limit=5")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let json: serde_json::Value = response.json();
    assert_eq!(json["kind"], "DeploymentList");
}

#[tokio::test]
async fn test_authorization_replaced_with_single_bearer() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/namespaces/default/secrets"))
        .and(header_eq("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = gateway(&config_for(&upstream.uri()))
        .get("/api/v1/namespaces/default/secrets")
        .add_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer client-supplied"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let received = upstream.received_requests().await.expect("recording enabled");
    assert_eq!(received.len(), 1);
    let auth: Vec<_> = received[0].headers.get_all("authorization").iter().collect();
    assert_eq!(auth.len(), 1, "exactly one Authorization header upstream");
    assert_eq!(auth[0], format!("Bearer {}", TOKEN).as_str());
}

#[tokio::test]
async fn test_unmatched_path_never_reaches_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&upstream).await;

    let server = gateway(&config_for(&upstream.uri()));
    for unmatched in ["/", "/apix/v1", "/API/v1", "/metrics"] {
        let response = server.get(unmatched).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "{}", unmatched);
    }
}

#[tokio::test]
async fn test_sentinel_create_relays_created_bytes() {
    let upstream = MockServer::start().await;
    let collection = Sentinel::collection_path(GROUP, "default");
    let request_body = serde_json::to_vec(&sentinel()).expect("sentinel serializes");
    let created = br#"{"apiVersion":"secops.example.com/v1alpha1","kind":"Sentinel","metadata":{"name":"db-password","uid":"5e2c"}}"#;

    Mock::given(method("POST"))
        .and(path(collection.as_str()))
        .and(body_bytes(request_body.clone()))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_raw(created.to_vec(), "application/json")
                .insert_header("audit-id", "6f1c2d"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let response = gateway(&config_for(&upstream.uri()))
        .post(&collection)
        .add_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .bytes(request_body.into())
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.as_bytes().as_ref(), created.as_slice());
    assert_eq!(
        response.headers().get("audit-id"),
        Some(&HeaderValue::from_static("6f1c2d"))
    );
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE),
        Some(&HeaderValue::from_static("application/json"))
    );
}

#[tokio::test]
async fn test_upstream_errors_relayed_untouched() {
    let upstream = MockServer::start().await;
    let forbidden = serde_json::json!({
        "kind": "Status",
        "status": "Failure",
        "reason": "Forbidden",
        "code": 403
    });
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(403).set_body_json(forbidden.clone()))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("etcdserver: request timed out"))
        .mount(&upstream)
        .await;

    let server = gateway(&config_for(&upstream.uri()));

    let response = server.delete("/api/v1/namespaces/default/secrets/db").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let json: serde_json::Value = response.json();
    assert_eq!(json, forbidden);

    let response = server.get("/api/v1/namespaces").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text(), "etcdserver: request timed out");
}

#[tokio::test]
async fn test_refused_upstream_is_502_within_timeout() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    let closed = format!("http://{}", listener.local_addr().expect("local addr"));
    drop(listener);

    let server = gateway(&config_for(&closed));
    let started = Instant::now();
    let response = server.get("/api/v1/pods").await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    assert!(started.elapsed() < Duration::from_secs(2));
    let body = response.text();
    assert!(!body.contains(TOKEN));
    assert!(!body.contains(&closed));
}

#[tokio::test]
async fn test_slow_upstream_is_504() {
    let upstream = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&upstream)
        .await;

    let config = GatewayConfig { request_timeout_secs: 1, ..config_for(&upstream.uri()) };
    let response = gateway(&config).get("/api/v1/namespaces").await;

    assert_eq!(response.status_code(), StatusCode::GATEWAY_TIMEOUT);
    let json: serde_json::Value = response.json();
    assert_eq!(json["error"]["code"], 504);
}

#[tokio::test]
async fn test_oversized_body_is_413_without_upstream_call() {
    let upstream = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(201)).expect(0).mount(&upstream).await;

    let response = gateway(&config_for(&upstream.uri()))
        .post("/api/v1/namespaces/default/configmaps")
        .bytes(vec![b'a'; 4096].into())
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_connection_scoped_headers_not_forwarded() {
    let upstream = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(1).mount(&upstream).await;

    let response = gateway(&config_for(&upstream.uri()))
        .get("/api/v1/pods")
        .add_header(header::CONNECTION, HeaderValue::from_static("x-session-hint"))
        .add_header(HeaderName::from_static("x-session-hint"), HeaderValue::from_static("abc"))
        .add_header(header::PROXY_AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="))
        .add_header(HeaderName::from_static("x-request-tag"), HeaderValue::from_static("kept"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let received = upstream.received_requests().await.expect("recording enabled");
    let headers = &received[0].headers;
    assert!(headers.get("x-session-hint").is_none());
    assert!(headers.get("proxy-authorization").is_none());
    assert_eq!(headers.get("x-request-tag").map(|v| v.as_bytes()), Some(b"kept".as_slice()));
}

#[tokio::test]
async fn test_create_secret_shortcut() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/namespaces/my-namespace/secrets"))
        .and(header_eq("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"kind":"Secret"}"#))
        .expect(1)
        .mount(&upstream)
        .await;

    let config = GatewayConfig {
        secret_shortcut: Some(SecretShortcutConfig { namespace: "my-namespace".to_string() }),
        ..config_for(&upstream.uri())
    };
    let response = gateway(&config)
        .post("/create-secret")
        .add_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .text(r#"{"apiVersion":"v1","kind":"Secret","metadata":{"name":"x"}}"#)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    assert_eq!(response.text(), r#"{"kind":"Secret"}"#);
}

#[tokio::test]
async fn test_upstream_base_path_prefix_kept() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/k8s/clusters/c-1/api/v1/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&upstream)
        .await;

    let base = format!("{}/k8s/clusters/c-1/", upstream.uri());
    let response = gateway(&config_for(&base)).get("/api/v1/nodes").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_dot_segments_rejected_before_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&upstream).await;

    let addr = serve_gateway(&config_for(&upstream.uri())).await;
    for target in [
        "/api/../metrics",
        "/api/%2e%2e/logs/",
        "/api/%2E%2E/metrics",
        "/apis/./../healthz",
        "/api/v1/namespaces/default/pods/../../../../metrics",
    ] {
        let response = raw_exchange(addr, target).await;
        assert!(response.starts_with("HTTP/1.1 404"), "{} -> {}", target, response);
        assert!(!response.contains(TOKEN));
    }
}

#[tokio::test]
async fn test_encoded_slash_reaches_upstream_verbatim() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/namespaces/default/secrets/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&upstream)
        .await;

    let addr = serve_gateway(&config_for(&upstream.uri())).await;
    let response = raw_exchange(addr, "/api/v1/namespaces/default/secrets/a%2Fb").await;

    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    let received = upstream.received_requests().await.expect("recording enabled");
    assert_eq!(received[0].url.path(), "/api/v1/namespaces/default/secrets/a%2Fb");
}

#[tokio::test]
async fn test_content_length_relayed_on_get() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/namespaces/default"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"kind":"Namespace"}"#))
        .mount(&upstream)
        .await;

    let response = gateway(&config_for(&upstream.uri())).get("/api/v1/namespaces/default").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_LENGTH), "20");
    assert_eq!(response.text(), r#"{"kind":"Namespace"}"#);
}

#[tokio::test]
async fn test_content_length_relayed_on_head() {
    let upstream = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/api/v1/namespaces/default"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", "20")
                .set_body_string(r#"{"kind":"Namespace"}"#),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let response = gateway(&config_for(&upstream.uri()))
        .method(axum::http::Method::HEAD, "/api/v1/namespaces/default")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_LENGTH), "20");
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn test_client_disconnect_cancels_upstream_call() {
    // Upstream that accepts, swallows the request and never answers; it
    // reports once the gateway side of the connection is closed.
    let upstream = TcpListener::bind("127.0.0.1:0").await.expect("bind upstream");
    let upstream_addr = upstream.local_addr().expect("local addr");
    let (closed_tx, closed_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let Ok((mut conn, _)) = upstream.accept().await else {
            return;
        };
        let mut buf = [0u8; 1024];
        loop {
            match conn.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => {},
            }
        }
        let _ = closed_tx.send(());
    });

    let config = GatewayConfig {
        request_timeout_secs: 30,
        ..config_for(&format!("http://{}", upstream_addr))
    };
    let addr = serve_gateway(&config).await;

    let mut client = TcpStream::connect(addr).await.expect("connect gateway");
    client
        .write_all(b"GET /api/v1/pods?watch=true HTTP/1.1\r\nHost: gateway\r\n\r\n")
        .await
        .expect("write request");
    let mut buf = [0u8; 64];
    let waited = tokio::time::timeout(Duration::from_millis(500), client.read(&mut buf)).await;
    assert!(waited.is_err(), "upstream never answers, so neither does the gateway");
    drop(client);

    tokio::time::timeout(Duration::from_secs(5), closed_rx)
        .await
        .expect("upstream connection closed after client went away")
        .expect("upstream task reported");
}
