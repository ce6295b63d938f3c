//! Test helpers for kubegate-server unit tests.

use std::sync::Arc;

use kubegate_core::GatewayState;
use kubegate_types::{GatewayConfig, SecretString};

/// Gateway state pointing at a loopback port nothing listens on, so any
/// forwarded request fails fast with 502.
pub fn test_gateway_state() -> Arc<GatewayState> {
    let reserved = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    let upstream = format!("http://{}", reserved.local_addr().expect("local addr"));
    drop(reserved);

    let config = GatewayConfig {
        upstream_base_url: upstream,
        bearer_token: SecretString::new("server-test-token"),
        custom_groups: vec!["secops.example.com".to_string()],
        request_timeout_secs: 5,
        connect_timeout_secs: 2,
        ..GatewayConfig::default()
    };

    Arc::new(GatewayState::from_config(&config).expect("valid test config"))
}
