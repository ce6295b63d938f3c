//! Credential provider.
//!
//! Holds the service-account bearer token and the upstream base URL for the
//! lifetime of the process. There is no refresh: rotating the token means
//! restarting with new configuration.

use axum::http::HeaderValue;
use url::Url;

use kubegate_types::{ConfigError, GatewayConfig, SecretString};

use crate::modules::config::read_secret_file;

/// Bearer credential presented to the upstream API server.
#[derive(Clone)]
pub struct Credential {
    token: SecretString,
    issued_for: Option<String>,
    authorization: HeaderValue,
}

impl Credential {
    /// Build a credential; rejects blank tokens and tokens that cannot be
    /// carried in an HTTP header.
    pub fn new(token: SecretString, issued_for: Option<String>) -> Result<Self, ConfigError> {
        if token.is_blank() {
            return Err(ConfigError::Missing { field: "bearer_token".to_string() });
        }

        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", token.expose().trim())).map_err(|_| {
                ConfigError::ValidationError {
                    field: "bearer_token".to_string(),
                    message: "token contains characters not allowed in an HTTP header".to_string(),
                }
            })?;
        authorization.set_sensitive(true);

        Ok(Self { token, issued_for, authorization })
    }

    /// `Authorization` header value: exactly `Bearer <token>`.
    pub fn authorization_header(&self) -> &HeaderValue {
        &self.authorization
    }

    pub fn issued_for(&self) -> Option<&str> {
        self.issued_for.as_deref()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.token)
            .field("issued_for", &self.issued_for)
            .finish_non_exhaustive()
    }
}

/// Read-only source of the upstream credential and base URL.
pub trait CredentialProvider: Send + Sync {
    fn current(&self) -> &Credential;
    fn upstream_base(&self) -> &Url;
}

/// Provider fixed at startup from [`GatewayConfig`].
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credential: Credential,
    upstream_base: Url,
}

impl StaticCredentialProvider {
    /// Resolve the token (inline value first, then `bearer_token_file`) and
    /// the upstream URL. Fails fast when either is absent or blank.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let upstream_base = parse_upstream_base(&config.upstream_base_url)?;

        let token = if !config.bearer_token.is_blank() {
            config.bearer_token.clone()
        } else if let Some(path) = &config.bearer_token_file {
            SecretString::new(read_secret_file(path)?)
        } else {
            return Err(ConfigError::Missing { field: "bearer_token".to_string() });
        };

        let credential = Credential::new(token, config.service_account.clone())?;
        Ok(Self { credential, upstream_base })
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn current(&self) -> &Credential {
        &self.credential
    }

    fn upstream_base(&self) -> &Url {
        &self.upstream_base
    }
}

fn parse_upstream_base(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::Missing { field: "upstream_base_url".to_string() });
    }

    let invalid = |message: &str| ConfigError::ValidationError {
        field: "upstream_base_url".to_string(),
        message: message.to_string(),
    };

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a query or fragment"));
    }
    Ok(url)
}
