//! # kubegate Core
//!
//! Credential-injecting reverse proxy in front of a Kubernetes API server.
//!
//! ## Architecture
//!
//! ```text
//! kubegate-core/src/proxy/
//! ├── credential.rs     # Credential provider (token + upstream base, static per process)
//! ├── routing.rs        # Path router (/apis/<group> > /apis > /api)
//! ├── upstream/         # reqwest client, TLS trust policy, transport error mapping
//! ├── handlers/         # Forwarding gateway + /create-secret alias
//! ├── middleware/       # CORS
//! └── server.rs         # GatewayState + axum router assembly
//! ```
//!
//! Everything under `proxy` is built once at startup from a validated
//! [`kubegate_types::GatewayConfig`] and is read-only while serving.

#![allow(clippy::map_err_ignore, reason = "Error context is provided in the replacement message")]
// Test-only lints: allow panic!, println!, etc. in test code
#![cfg_attr(test, allow(clippy::panic, clippy::print_stdout, clippy::assertions_on_result_states))]

pub mod modules;
pub mod proxy;

pub use proxy::{build_gateway_router, GatewayState};
