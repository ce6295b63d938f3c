//! Configuration enums for routing and upstream trust.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Kubernetes API group family a route rule serves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ApiGroup {
    /// Built-in resources under `/api`
    Core,
    /// Extension groups under `/apis`
    Extension,
    /// A specific custom-resource group under `/apis/<group>`
    Custom,
}

impl fmt::Display for ApiGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Core => write!(f, "core"),
            Self::Extension => write!(f, "extension"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// Certificate verification policy for the upstream connection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TlsTrustPolicy {
    /// Verify the upstream certificate chain
    #[default]
    Verify,
    /// Accept any upstream certificate (legacy compatibility only)
    InsecureSkipVerify,
}

impl TlsTrustPolicy {
    pub fn is_insecure(self) -> bool {
        matches!(self, Self::InsecureSkipVerify)
    }
}

impl fmt::Display for TlsTrustPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Verify => write!(f, "verify"),
            Self::InsecureSkipVerify => write!(f, "insecure_skip_verify"),
        }
    }
}

impl FromStr for TlsTrustPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "verify" => Ok(Self::Verify),
            "insecure_skip_verify" | "insecure" => Ok(Self::InsecureSkipVerify),
            other => Err(ConfigError::ValidationError {
                field: "tls_trust_policy".to_string(),
                message: format!("unknown policy '{}' (expected verify or insecure_skip_verify)", other),
            }),
        }
    }
}
