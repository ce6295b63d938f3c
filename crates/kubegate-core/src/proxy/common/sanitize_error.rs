//! Client-facing error responses.
//!
//! Pattern: log the raw error server-side, return only an opaque message
//! with the HTTP status code to the client. No upstream address, error
//! chain or credential material ever reaches the response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kubegate_types::ProxyError;
use serde_json::json;

/// Render `err` as `{"error": {"code": <status>, "message": <generic>}}`.
pub fn error_response(err: &ProxyError) -> Response {
    let code = err.http_status_code();
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": {
                "code": status.as_u16(),
                "message": err.client_message(),
            }
        })),
    )
        .into_response()
}
