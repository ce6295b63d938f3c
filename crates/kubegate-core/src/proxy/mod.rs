//! Proxy module - credential-injecting Kubernetes API gateway
//!
//! - Path routing between the core group (`/api`), extension groups
//!   (`/apis`) and configured custom-resource groups
//! - Bearer token injection from a process-wide credential provider
//! - Upstream TLS trust policy, timeouts and transport error mapping

pub mod common;
pub mod credential;
pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod server;
pub mod upstream;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use credential::{Credential, CredentialProvider, StaticCredentialProvider};
pub use routing::{PathRouter, RouteRule};
pub use server::{build_gateway_router, GatewayState};
pub use upstream::client::{UpstreamClient, UpstreamTarget};

#[cfg(test)]
mod tests;
