//! # kubegate Types
//!
//! Configuration model, error definitions and forwarded resource schemas for
//! the kubegate credential-injecting proxy.
//!
//! - **`error`** - Typed error hierarchy for proxy and configuration failures
//! - **`models`** - Gateway configuration, routing enums, secret wrapper and
//!   the `Sentinel` custom resource schema
//!
//! ## Architecture Role
//!
//! `kubegate-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!        kubegate-types (this crate)
//!                │
//!                ▼
//!          kubegate-core
//!                │
//!                ▼
//!         kubegate-server
//! ```

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ConfigError, ProxyError};

// Re-export core model types
pub use models::{
    ApiGroup, GatewayConfig, SecretShortcutConfig, SecretString, Sentinel, SentinelData,
    SentinelSpec, TlsTrustPolicy,
};
