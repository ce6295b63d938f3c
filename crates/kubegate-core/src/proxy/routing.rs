//! Path router.
//!
//! Maps an inbound request path to the route rule that owns it. Rules are
//! built once at startup and matched longest-prefix first, on path segment
//! boundaries, case-sensitively. The body is never looked at.

use url::Url;

use kubegate_types::{ApiGroup, ConfigError, ProxyError, TlsTrustPolicy};

use super::upstream::client::UpstreamTarget;

/// Prefix of the Kubernetes core API group.
pub const CORE_PREFIX: &str = "/api";
/// Prefix of the Kubernetes extension API groups.
pub const EXTENSION_PREFIX: &str = "/apis";

/// One entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub prefix: String,
    pub api_group: ApiGroup,
    pub upstream_base: Url,
    pub target: UpstreamTarget,
}

impl RouteRule {
    pub fn new(
        prefix: impl Into<String>,
        api_group: ApiGroup,
        upstream_base: Url,
        target: UpstreamTarget,
    ) -> Self {
        Self { prefix: prefix.into(), api_group, upstream_base, target }
    }

    /// `/api` matches `/api` and `/api/...` but never `/apis` or `/apix`.
    pub fn matches(&self, path: &str) -> bool {
        path.strip_prefix(self.prefix.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }
}

/// Immutable, longest-prefix-first route table.
#[derive(Debug, Clone)]
pub struct PathRouter {
    rules: Vec<RouteRule>,
}

impl PathRouter {
    /// Build a router from explicit rules. Duplicate prefixes are rejected so
    /// that every path matches at most one rule.
    pub fn new(mut rules: Vec<RouteRule>) -> Result<Self, ConfigError> {
        for rule in &rules {
            if !rule.prefix.starts_with('/') || rule.prefix.len() < 2 || rule.prefix.ends_with('/') {
                return Err(ConfigError::ValidationError {
                    field: "routes".to_string(),
                    message: format!("invalid route prefix '{}'", rule.prefix),
                });
            }
        }

        rules.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()).then_with(|| a.prefix.cmp(&b.prefix)));

        if let Some(pair) = rules.windows(2).find(|pair| pair[0].prefix == pair[1].prefix) {
            return Err(ConfigError::ValidationError {
                field: "routes".to_string(),
                message: format!("duplicate route prefix '{}'", pair[0].prefix),
            });
        }

        Ok(Self { rules })
    }

    /// Standard table: one rule per custom group, then `/apis`, then `/api`,
    /// all pointing at `upstream_base`.
    pub fn from_groups(
        custom_groups: &[String],
        upstream_base: &Url,
        tls_trust_policy: TlsTrustPolicy,
    ) -> Result<Self, ConfigError> {
        let target = UpstreamTarget::resolve(upstream_base, tls_trust_policy)?;
        let mut rules = Vec::with_capacity(custom_groups.len() + 2);

        for group in custom_groups {
            let group = group.trim();
            if group.is_empty() || group.contains('/') || group.contains(char::is_whitespace) {
                return Err(ConfigError::ValidationError {
                    field: "custom_groups".to_string(),
                    message: format!("invalid API group name '{}'", group),
                });
            }
            rules.push(RouteRule::new(
                format!("{}/{}", EXTENSION_PREFIX, group),
                ApiGroup::Custom,
                upstream_base.clone(),
                target.clone(),
            ));
        }

        rules.push(RouteRule::new(
            EXTENSION_PREFIX,
            ApiGroup::Extension,
            upstream_base.clone(),
            target.clone(),
        ));
        rules.push(RouteRule::new(CORE_PREFIX, ApiGroup::Core, upstream_base.clone(), target));

        Self::new(rules)
    }

    /// Find the rule owning `path`.
    ///
    /// Paths with `.` or `..` segments never match: URL normalization would
    /// move them outside the prefix that was matched here.
    pub fn route(&self, path: &str) -> Result<&RouteRule, ProxyError> {
        if has_dot_segment(path) {
            return Err(ProxyError::RouteNotFound { path: path.to_string() });
        }

        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .ok_or_else(|| ProxyError::RouteNotFound { path: path.to_string() })
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }
}

/// True if any segment is `.` or `..`, raw or percent-encoded (`%2e`).
pub fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}
