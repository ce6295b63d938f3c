mod request_executor;


pub use request_executor::{
    build_request_headers, build_response_headers, build_url, resolve_upstream_url,
};

use axum::http::{HeaderMap, Method};
use bytes::Bytes;
use reqwest::Client;
use std::sync::Once;
use std::time::Duration;
use url::Url;

use kubegate_types::{ConfigError, GatewayConfig, ProxyError, TlsTrustPolicy};

use super::transport_error::classify_transport_error;
use crate::proxy::common::{build_http_client, ClientSettings};

static INSECURE_TLS_WARNING: Once = Once::new();

/// Connection parameters resolved once per route rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub host: String,
    pub port: u16,
    pub tls_trust_policy: TlsTrustPolicy,
}

impl UpstreamTarget {
    pub fn resolve(base: &Url, tls_trust_policy: TlsTrustPolicy) -> Result<Self, ConfigError> {
        let invalid = |message: &str| ConfigError::ValidationError {
            field: "upstream_base_url".to_string(),
            message: message.to_string(),
        };

        let host = base.host_str().ok_or_else(|| invalid("missing host"))?.to_string();
        let port = base.port_or_known_default().ok_or_else(|| invalid("missing port"))?;

        Ok(Self { host, port, tls_trust_policy })
    }
}

impl std::fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} (tls: {})", self.host, self.port, self.tls_trust_policy)
    }
}

/// HTTP client towards the API server, shared by every in-flight request.
///
/// Pooled connections are reused, but each request carries exactly one
/// `Authorization` header set by the gateway.
pub struct UpstreamClient {
    http_client: Client,
    request_timeout: Duration,
}

impl UpstreamClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, ConfigError> {
        if settings.tls_trust_policy.is_insecure() {
            INSECURE_TLS_WARNING.call_once(|| {
                tracing::warn!(
                    "⚠️ Upstream TLS certificate verification is DISABLED (tls_trust_policy=insecure_skip_verify). \
                     This is a legacy compatibility mode; use `verify` with a CA bundle for new deployments."
                );
            });
        }

        let http_client = build_http_client(settings)?;

        Ok(Self {
            http_client,
            request_timeout: settings.request_timeout,
        })
    }

    /// Build from gateway configuration, loading the optional CA bundle.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let ca_cert_pem = match &config.ca_cert_file {
            Some(path) => {
                Some(std::fs::read(path).map_err(|e| ConfigError::from_io_error(path, &e))?)
            },
            None => None,
        };

        Self::new(&ClientSettings {
            tls_trust_policy: config.tls_trust_policy,
            ca_cert_pem,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Send one request. Upstream 4xx/5xx come back as `Ok`; only transport
    /// failures are mapped to [`ProxyError`].
    pub async fn send(
        &self,
        method: Method,
        url: Url,
        headers: HeaderMap,
        body: Bytes,
    ) -> Result<reqwest::Response, ProxyError> {
        self.http_client
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e, self.request_timeout))
    }
}
