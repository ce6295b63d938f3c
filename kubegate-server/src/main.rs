//! kubegate Server - Headless Daemon
//!
//! Credential-injecting reverse proxy in front of a Kubernetes API server:
//! - Forwards `/api/*` and `/apis/*` with the configured service-account token
//! - Optional `POST /create-secret` alias for the browser console
//! - `/healthz` for liveness probes
//!
//! Default listen address: http://0.0.0.0:5000

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod cli;
mod router;
mod server_utils;

#[cfg(test)]
mod test_helpers;

use cli::Cli;
use kubegate_core::modules::logger::init_logger;
use kubegate_core::GatewayState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(&cli.log_level);

    info!("🚀 kubegate v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = cli.build_config().context("Failed to load configuration")?;
    let state = GatewayState::from_config(&config).context("Invalid gateway configuration")?;

    let app = router::build_router(Arc::new(state), &config.cors_allowed_origins);
    let listener = server_utils::create_listener(&config).await?;

    info!("🌐 Server listening on http://{}", listener.local_addr()?);
    info!("🔀 Forwarding /api and /apis to {}", config.upstream_base_url);

    axum::serve(listener, app).with_graceful_shutdown(server_utils::shutdown_signal()).await?;

    info!("✅ Server stopped");
    Ok(())
}
