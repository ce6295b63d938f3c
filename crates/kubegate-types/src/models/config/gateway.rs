//! Gateway process configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use super::enums::TlsTrustPolicy;
use crate::error::ConfigError;
use crate::models::SecretString;

/// Full gateway configuration, built once at startup and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the Kubernetes API server (scheme, host, port, optional path)
    pub upstream_base_url: String,
    /// Service-account bearer token; takes precedence over `bearer_token_file`
    #[serde(skip_serializing)]
    pub bearer_token: SecretString,
    /// File holding the bearer token (e.g. a projected service-account token)
    pub bearer_token_file: Option<PathBuf>,
    /// Identity the token was issued for; informational only
    pub service_account: Option<String>,
    /// Port to listen on
    #[validate(range(min = 1_u16))]
    pub listen_port: u16,
    /// Interface to bind
    #[validate(length(min = 1_u64))]
    pub bind_address: String,
    /// Upstream certificate verification policy
    pub tls_trust_policy: TlsTrustPolicy,
    /// Extra PEM CA bundle trusted when verifying
    pub ca_cert_file: Option<PathBuf>,
    /// Total upstream timeout per proxied call, in seconds
    #[validate(range(min = 1_u64, max = 3600_u64))]
    pub request_timeout_secs: u64,
    /// Upstream connect timeout, in seconds
    #[validate(range(min = 1_u64, max = 300_u64))]
    pub connect_timeout_secs: u64,
    /// Largest request body accepted for forwarding
    #[validate(range(min = 1_usize))]
    pub max_body_bytes: usize,
    /// Custom-resource API groups routed ahead of the generic `/apis` rule
    pub custom_groups: Vec<String>,
    /// `POST /create-secret` alias; disabled when `None`
    #[validate(nested)]
    pub secret_shortcut: Option<SecretShortcutConfig>,
    /// Browser origins allowed via CORS; empty disables the CORS layer
    pub cors_allowed_origins: Vec<String>,
}

/// Target of the `POST /create-secret` alias.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct SecretShortcutConfig {
    /// Namespace the secret is created in
    #[validate(length(min = 1_u64, max = 63_u64))]
    pub namespace: String,
}

impl SecretShortcutConfig {
    /// Upstream path secrets are posted to.
    pub fn upstream_path(&self) -> String {
        format!("/api/v1/namespaces/{}/secrets", self.namespace)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            upstream_base_url: String::new(),
            bearer_token: SecretString::default(),
            bearer_token_file: None,
            service_account: None,
            listen_port: default_listen_port(),
            bind_address: "0.0.0.0".to_string(),
            tls_trust_policy: TlsTrustPolicy::default(),
            ca_cert_file: None,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_body_bytes: 10 * 1024 * 1024,
            custom_groups: Vec::new(),
            secret_shortcut: None,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl GatewayConfig {
    /// Get the full bind socket address.
    pub fn get_socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.listen_port)
    }

    /// Run field-level validation, mapped into [`ConfigError`].
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|e| ConfigError::from_validation_errors(&e))
    }
}

pub const fn default_listen_port() -> u16 {
    5000
}
