//! Typed error definitions for kubegate.
//!
//! - **Serializable** via serde, for structured logs and tests
//! - **Displayable** for logging via Display trait
//! - **Matchable** for status mapping via enum variants

mod config;
mod proxy;

pub use config::ConfigError;
pub use proxy::ProxyError;
