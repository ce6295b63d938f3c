//! Proxy-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while routing or forwarding a request.
///
/// The `Display` text is operator-facing and may carry diagnostic detail.
/// Callers only ever see [`ProxyError::client_message`].
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ProxyError {
    /// No route rule matches the inbound path
    #[error("No route for path: {path}")]
    RouteNotFound { path: String },

    /// Connection refused, DNS failure, reset during connect
    #[error("Upstream unreachable: {message}")]
    UpstreamUnreachable { message: String },

    /// Upstream did not answer within the configured bound
    #[error("Upstream timeout after {duration_secs}s")]
    UpstreamTimeout { duration_secs: u64 },

    /// TLS handshake rejected the upstream certificate
    #[error("Upstream TLS trust failure: {message}")]
    TlsTrustFailure { message: String },

    /// Request body exceeds the configured limit
    #[error("Payload exceeds {limit_bytes} bytes")]
    PayloadTooLarge { limit_bytes: usize },

    /// Any other transport failure talking to the upstream
    #[error("Upstream transport error: {message}")]
    Transport { message: String },

    /// Internal proxy error (bugs, unexpected states)
    #[error("Internal proxy error: {message}")]
    Internal { message: String },
}

impl ProxyError {
    /// Get HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::RouteNotFound { .. } => 404,
            Self::UpstreamUnreachable { .. } | Self::TlsTrustFailure { .. } => 502,
            Self::UpstreamTimeout { .. } => 504,
            Self::PayloadTooLarge { .. } => 413,
            Self::Transport { .. } | Self::Internal { .. } => 500,
        }
    }

    /// Generic message safe to hand back to the caller.
    ///
    /// Never includes upstream addresses, credentials or error chains.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::RouteNotFound { .. } => "Not Found",
            Self::UpstreamUnreachable { .. } | Self::TlsTrustFailure { .. } => "Bad Gateway",
            Self::UpstreamTimeout { .. } => "Gateway Timeout",
            Self::PayloadTooLarge { .. } => "Payload Too Large",
            Self::Transport { .. } | Self::Internal { .. } => "Internal Server Error",
        }
    }
}
