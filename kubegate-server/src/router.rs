use axum::{http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;

use kubegate_core::proxy::middleware::cors_layer;
use kubegate_core::{build_gateway_router, GatewayState};

/// Health/version endpoints, the gateway, and CORS if any origin is allowed.
pub fn build_router(state: Arc<GatewayState>, cors_origins: &[String]) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/version", get(version_info));

    let router = public_routes.merge(build_gateway_router(state));

    match cors_layer(cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, axum::Json(serde_json::json!({"status": "ok"})))
}

async fn version_info() -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
