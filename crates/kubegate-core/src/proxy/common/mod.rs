//! Common utilities module
//!
//! Shared by the gateway handlers and the upstream client.

pub mod client_builder;
pub mod header_constants;
pub mod sanitize_error;

pub use client_builder::{build_http_client, ClientSettings};
pub use sanitize_error::error_response;
