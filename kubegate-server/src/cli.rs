use clap::Parser;
use std::path::PathBuf;

use kubegate_core::modules::config::load_config;
use kubegate_types::{ConfigError, GatewayConfig, SecretShortcutConfig, SecretString, TlsTrustPolicy};

/// Every setting is optional here: unset flags fall back to the config file,
/// then to built-in defaults.
#[derive(Parser, Debug)]
#[command(
    name = "kubegate",
    about = "kubegate - credential-injecting reverse proxy for the Kubernetes API",
    version = env!("CARGO_PKG_VERSION"),
    author
)]
pub struct Cli {
    #[arg(short, long, env = "KUBEGATE_CONFIG", help = "JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, env = "KUBEGATE_PORT", help = "Listen port [default: 5000]")]
    pub port: Option<u16>,

    #[arg(long, env = "KUBEGATE_BIND_ADDRESS", help = "Listen address [default: 0.0.0.0]")]
    pub bind_address: Option<String>,

    #[arg(short, long, env = "KUBEGATE_UPSTREAM_URL", help = "Kubernetes API server base URL")]
    pub upstream_url: Option<String>,

    #[arg(
        long,
        env = "KUBEGATE_BEARER_TOKEN",
        hide_env_values = true,
        help = "Bearer token (visible in the process list; prefer KUBEGATE_BEARER_TOKEN or --bearer-token-file)"
    )]
    pub bearer_token: Option<String>,

    #[arg(long, env = "KUBEGATE_BEARER_TOKEN_FILE", help = "File holding the bearer token")]
    pub bearer_token_file: Option<PathBuf>,

    #[arg(long, env = "KUBEGATE_SERVICE_ACCOUNT", help = "Identity the token was issued for")]
    pub service_account: Option<String>,

    #[arg(long, env = "KUBEGATE_TLS_TRUST_POLICY", help = "verify | insecure_skip_verify")]
    pub tls_trust_policy: Option<TlsTrustPolicy>,

    #[arg(long, env = "KUBEGATE_CA_CERT_FILE", help = "PEM CA bundle for the API server")]
    pub ca_cert_file: Option<PathBuf>,

    #[arg(long, env = "KUBEGATE_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    #[arg(long, env = "KUBEGATE_CONNECT_TIMEOUT_SECS")]
    pub connect_timeout_secs: Option<u64>,

    #[arg(long, env = "KUBEGATE_MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,

    #[arg(
        long = "custom-group",
        env = "KUBEGATE_CUSTOM_GROUPS",
        value_delimiter = ',',
        help = "Custom API group routed ahead of /apis (repeatable)"
    )]
    pub custom_groups: Vec<String>,

    #[arg(long, env = "KUBEGATE_SECRET_NAMESPACE", help = "Enable POST /create-secret")]
    pub secret_namespace: Option<String>,

    #[arg(long = "cors-origin", env = "KUBEGATE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Config file (if any) with command-line and environment overrides on
    /// top. Validation happens when the gateway state is built.
    pub fn build_config(&self) -> Result<GatewayConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => load_config(path)?,
            None => GatewayConfig::default(),
        };
        Ok(self.apply_overrides(base))
    }

    fn apply_overrides(&self, mut config: GatewayConfig) -> GatewayConfig {
        if let Some(port) = self.port {
            config.listen_port = port;
        }
        if let Some(addr) = &self.bind_address {
            config.bind_address = addr.clone();
        }
        if let Some(url) = &self.upstream_url {
            config.upstream_base_url = url.clone();
        }
        if let Some(token) = &self.bearer_token {
            config.bearer_token = SecretString::new(token.clone());
        }
        if let Some(path) = &self.bearer_token_file {
            config.bearer_token_file = Some(path.clone());
        }
        if let Some(account) = &self.service_account {
            config.service_account = Some(account.clone());
        }
        if let Some(policy) = self.tls_trust_policy {
            config.tls_trust_policy = policy;
        }
        if let Some(path) = &self.ca_cert_file {
            config.ca_cert_file = Some(path.clone());
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(secs) = self.connect_timeout_secs {
            config.connect_timeout_secs = secs;
        }
        if let Some(bytes) = self.max_body_bytes {
            config.max_body_bytes = bytes;
        }
        if !self.custom_groups.is_empty() {
            config.custom_groups = self.custom_groups.clone();
        }
        if let Some(namespace) = &self.secret_namespace {
            config.secret_shortcut = Some(SecretShortcutConfig { namespace: namespace.clone() });
        }
        if !self.cors_origins.is_empty() {
            config.cors_allowed_origins = self.cors_origins.clone();
        }
        config
    }
}
