//! Forwarding handler.
//!
//! Every routed request goes through [`forward`]: buffer the body (bounded),
//! swap the credential in, send upstream, stream the answer back. Upstream
//! 4xx/5xx are relayed as-is; only transport failures become gateway errors.

use std::sync::Arc;
use std::time::Instant;

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::response::Response;
use http_body_util::LengthLimitError;
use tracing::{debug, error, info, warn};

use kubegate_types::ProxyError;

use crate::proxy::common::error_response;
use crate::proxy::routing::RouteRule;
use crate::proxy::server::GatewayState;
use crate::proxy::upstream::client::{
    build_request_headers, build_response_headers, resolve_upstream_url,
};

/// Fallback handler: route by path, then forward.
pub async fn handle_forward(State(state): State<Arc<GatewayState>>, request: Request) -> Response {
    let path = request.uri().path().to_string();

    match state.router.route(&path) {
        Ok(rule) => forward(&state, rule, request, None).await,
        Err(e) => {
            debug!("No route for {} {}", request.method(), path);
            error_response(&e)
        },
    }
}

/// Forward `request` to the upstream owning `rule`.
///
/// `path_override` replaces the inbound path (query is kept); used by
/// aliases such as `/create-secret`.
pub(crate) async fn forward(
    state: &GatewayState,
    rule: &RouteRule,
    request: Request,
    path_override: Option<&str>,
) -> Response {
    let trace_id = short_trace_id();
    let started = Instant::now();

    let (parts, body) = request.into_parts();
    let method = parts.method;
    let path = path_override.unwrap_or(parts.uri.path());
    let url = match resolve_upstream_url(&rule.upstream_base, path, parts.uri.query()) {
        Ok(url) => url,
        Err(e) => {
            debug!("[{}] {} {} refused: {}", trace_id, method, path, e);
            return error_response(&e);
        },
    };

    let body = match read_body(body, &parts.headers, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("[{}] {} {} rejected: {}", trace_id, method, path, e);
            return error_response(&e);
        },
    };

    let headers =
        build_request_headers(&parts.headers, state.credentials.current().authorization_header());

    debug!(
        "[{}] {} {} -> {} ({} group, {} bytes)",
        trace_id,
        method,
        path,
        rule.target,
        rule.api_group,
        body.len()
    );

    match state.upstream.send(method.clone(), url, headers, body).await {
        Ok(upstream) => {
            let status = upstream.status();
            info!(
                "[{}] {} {} -> {} in {}ms",
                trace_id,
                method,
                path,
                status.as_u16(),
                started.elapsed().as_millis()
            );

            let headers = build_response_headers(upstream.headers());
            let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
            *response.status_mut() = status;
            *response.headers_mut() = headers;
            response
        },
        Err(e) => {
            match &e {
                ProxyError::TlsTrustFailure { message } => error!(
                    "[{}] TLS trust failure towards {}: {}",
                    trace_id, rule.target, message
                ),
                other => warn!(
                    "[{}] {} {} failed after {}ms: {}",
                    trace_id,
                    method,
                    path,
                    started.elapsed().as_millis(),
                    other
                ),
            }
            error_response(&e)
        },
    }
}

/// Buffer the request body, refusing anything over `limit` bytes.
async fn read_body(body: Body, headers: &HeaderMap, limit: usize) -> Result<Bytes, ProxyError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    if declared.is_some_and(|len| len > limit as u64) {
        return Err(ProxyError::PayloadTooLarge { limit_bytes: limit });
    }

    to_bytes(body, limit).await.map_err(|e| {
        if is_length_limit(&e) {
            ProxyError::PayloadTooLarge { limit_bytes: limit }
        } else {
            ProxyError::Transport { message: format!("failed to read request body: {}", e) }
        }
    })
}

fn is_length_limit(error: &axum::Error) -> bool {
    let mut current = std::error::Error::source(error);
    while let Some(e) = current {
        if e.downcast_ref::<LengthLimitError>().is_some() {
            return true;
        }
        current = e.source();
    }
    false
}

fn short_trace_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}
