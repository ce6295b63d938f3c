use kubegate_types::{ConfigError, TlsTrustPolicy};
use std::time::Duration;

/// Connection parameters for the upstream HTTP client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub tls_trust_policy: TlsTrustPolicy,
    /// Extra PEM root certificate trusted under [`TlsTrustPolicy::Verify`]
    pub ca_cert_pem: Option<Vec<u8>>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            tls_trust_policy: TlsTrustPolicy::Verify,
            ca_cert_pem: None,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Build the HTTP client used for every upstream call.
///
/// Redirects are never followed: a 3xx from the API server is relayed as-is.
pub fn build_http_client(settings: &ClientSettings) -> Result<reqwest::Client, ConfigError> {
    let mut builder = reqwest::Client::builder()
        .timeout(settings.request_timeout)
        .connect_timeout(settings.connect_timeout.min(settings.request_timeout))
        .redirect(reqwest::redirect::Policy::none())
        .tcp_nodelay(true);

    match settings.tls_trust_policy {
        TlsTrustPolicy::InsecureSkipVerify => {
            builder = builder.danger_accept_invalid_certs(true);
        },
        TlsTrustPolicy::Verify => {
            if let Some(pem) = &settings.ca_cert_pem {
                let cert = reqwest::Certificate::from_pem(pem).map_err(|e| {
                    ConfigError::ValidationError {
                        field: "ca_cert_file".to_string(),
                        message: format!("invalid PEM certificate: {}", e),
                    }
                })?;
                builder = builder.add_root_certificate(cert);
            }
        },
    }

    builder.build().map_err(|e| ConfigError::ValidationError {
        field: "upstream_client".to_string(),
        message: format!("Failed to build HTTP client: {}", e),
    })
}
