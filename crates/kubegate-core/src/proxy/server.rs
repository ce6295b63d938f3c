use axum::{routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use kubegate_types::{ConfigError, GatewayConfig};

use crate::proxy::credential::{CredentialProvider, StaticCredentialProvider};
use crate::proxy::routing::PathRouter;
use crate::proxy::upstream::client::UpstreamClient;

/// Shared, read-only gateway state. Built once at startup.
pub struct GatewayState {
    pub router: PathRouter,
    pub credentials: Arc<dyn CredentialProvider>,
    pub upstream: UpstreamClient,
    pub max_body_bytes: usize,
    /// Upstream path behind `POST /create-secret`, if enabled
    pub secret_shortcut_path: Option<String>,
}

impl GatewayState {
    pub fn new(
        router: PathRouter,
        credentials: Arc<dyn CredentialProvider>,
        upstream: UpstreamClient,
        max_body_bytes: usize,
        secret_shortcut_path: Option<String>,
    ) -> Self {
        Self { router, credentials, upstream, max_body_bytes, secret_shortcut_path }
    }

    /// Validate the configuration and build every component. Any missing or
    /// invalid setting is returned before a listener exists.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        config.check()?;

        let credentials = StaticCredentialProvider::from_config(config)?;
        let router = PathRouter::from_groups(
            &config.custom_groups,
            credentials.upstream_base(),
            config.tls_trust_policy,
        )?;
        let upstream = UpstreamClient::from_config(config)?;

        for rule in router.rules() {
            tracing::info!("🔀 Route {} ({}) -> {}", rule.prefix, rule.api_group, rule.target);
        }
        if let Some(account) = credentials.current().issued_for() {
            tracing::info!("🔑 Forwarding as service account '{}'", account);
        }

        let secret_shortcut_path = config.secret_shortcut.as_ref().map(|s| s.upstream_path());

        Ok(Self::new(
            router,
            Arc::new(credentials),
            upstream,
            config.max_body_bytes,
            secret_shortcut_path,
        ))
    }
}

/// Gateway router. Every path goes to the forwarding fallback; unmatched
/// paths answer 404 without touching the upstream. Handlers take the raw
/// request, so the body cap is enforced in `forward`, not by axum.
pub fn build_gateway_router(state: Arc<GatewayState>) -> Router<()> {
    use crate::proxy::handlers;

    let mut router = Router::new();
    if state.secret_shortcut_path.is_some() {
        router = router.route("/create-secret", post(handlers::handle_create_secret));
    }

    router
        .fallback(handlers::handle_forward)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
