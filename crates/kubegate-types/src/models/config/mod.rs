//! Gateway configuration models.

mod enums;
mod gateway;

pub use enums::{ApiGroup, TlsTrustPolicy};
pub use gateway::{default_listen_port, GatewayConfig, SecretShortcutConfig};
