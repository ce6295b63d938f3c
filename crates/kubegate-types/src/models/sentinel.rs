//! `Sentinel` custom resource schema.
//!
//! Documents what the admin console submits through the extension API group.
//! The gateway forwards these manifests as opaque bytes and never
//! deserializes them; the types exist for clients and tests.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SENTINEL_KIND: &str = "Sentinel";
pub const SENTINEL_API_VERSION: &str = "v1alpha1";

/// Declarative secret-provisioning policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Sentinel {
    /// `<group>/v1alpha1`, e.g. `secops.example.com/v1alpha1`
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: SentinelSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SentinelSpec {
    pub secret_name: String,
    pub data: SentinelData,
    pub secret_type: String,
    pub service_account: String,
    pub role: String,
    pub role_binding: String,
}

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentinelData {
    pub password: String,
}

impl std::fmt::Debug for SentinelData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentinelData").field("password", &"<redacted>").finish()
    }
}

impl Sentinel {
    /// Build a manifest for `group` with the console's default label set.
    pub fn new(group: &str, name: impl Into<String>, spec: SentinelSpec) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert("usertype".to_string(), "ServiceAccount".to_string());
        Self {
            api_version: format!("{}/{}", group, SENTINEL_API_VERSION),
            kind: SENTINEL_KIND.to_string(),
            metadata: ObjectMeta { name: name.into(), labels },
            spec,
        }
    }

    /// Collection path for this kind in `namespace`.
    pub fn collection_path(group: &str, namespace: &str) -> String {
        format!("/apis/{}/{}/namespaces/{}/sentinels", group, SENTINEL_API_VERSION, namespace)
    }
}
