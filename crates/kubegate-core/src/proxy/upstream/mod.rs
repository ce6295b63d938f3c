//! Upstream module - connection handling towards the Kubernetes API server

pub mod client;
pub mod transport_error;

pub use transport_error::classify_transport_error;
