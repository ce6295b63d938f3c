//! Domain models for kubegate.

mod config;
mod secret;
mod sentinel;

pub use config::{
    default_listen_port, ApiGroup, GatewayConfig, SecretShortcutConfig, TlsTrustPolicy,
};
pub use secret::SecretString;
pub use sentinel::{
    ObjectMeta, Sentinel, SentinelData, SentinelSpec, SENTINEL_API_VERSION, SENTINEL_KIND,
};
