use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::Response;

use kubegate_types::ProxyError;

use super::forward::forward;
use crate::proxy::common::error_response;
use crate::proxy::server::GatewayState;

/// `POST /create-secret`: forwarded as
/// `POST /api/v1/namespaces/<namespace>/secrets` on the configured namespace.
pub async fn handle_create_secret(
    State(state): State<Arc<GatewayState>>,
    request: Request,
) -> Response {
    let Some(path) = state.secret_shortcut_path.as_deref() else {
        return error_response(&ProxyError::RouteNotFound { path: request.uri().path().to_string() });
    };

    match state.router.route(path) {
        Ok(rule) => forward(&state, rule, request, Some(path)).await,
        Err(e) => error_response(&e),
    }
}
