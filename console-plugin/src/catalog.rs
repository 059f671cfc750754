//! Plugins the console knows how to edit, and where each one may be attached.

use console_core::ResourceKind;
use serde::Serialize;

/// Resource types a plugin can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginResourceType {
    Route,
    GlobalRule,
    Consumer,
    Upstream,
    ConsumerGroup,
}

impl PluginResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginResourceType::Route => "route",
            PluginResourceType::GlobalRule => "global_rule",
            PluginResourceType::Consumer => "consumer",
            PluginResourceType::Upstream => "upstream",
            PluginResourceType::ConsumerGroup => "consumer_group",
        }
    }

    /// Which catalog column applies to documents of `kind`.
    ///
    /// Plugin configs are attached to routes, so they share the route column.
    pub fn for_kind(kind: ResourceKind) -> Option<Self> {
        match kind {
            ResourceKind::Routes | ResourceKind::PluginConfigs => Some(PluginResourceType::Route),
            ResourceKind::GlobalRules => Some(PluginResourceType::GlobalRule),
            ResourceKind::Consumers => Some(PluginResourceType::Consumer),
            ResourceKind::Upstreams => Some(PluginResourceType::Upstream),
            ResourceKind::ConsumerGroups => Some(PluginResourceType::ConsumerGroup),
            ResourceKind::Ssls => None,
        }
    }
}

impl std::fmt::Display for PluginResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Catalog entry for one plugin.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PluginSpec {
    pub key: &'static str,
    pub name: &'static str,
    pub resources: &'static [PluginResourceType],
}

use PluginResourceType::{Consumer, ConsumerGroup, GlobalRule, Route, Upstream};

const CATALOG: &[PluginSpec] = &[
    PluginSpec { key: "key-auth", name: "Key Auth", resources: &[Route, Consumer] },
    PluginSpec { key: "basic-auth", name: "Basic Auth", resources: &[Route, Consumer] },
    PluginSpec { key: "jwt-auth", name: "JWT Auth", resources: &[Route, Consumer] },
    PluginSpec { key: "consumer-restriction", name: "Consumer Restriction", resources: &[Route, GlobalRule] },
    PluginSpec { key: "ip-restriction", name: "IP Restriction", resources: &[Route, GlobalRule, Consumer, ConsumerGroup] },
    PluginSpec { key: "limit-count", name: "Rate Limit (count)", resources: &[Route, GlobalRule, Consumer, ConsumerGroup] },
    PluginSpec { key: "limit-req", name: "Rate Limit (requests)", resources: &[Route, GlobalRule, Consumer, ConsumerGroup] },
    PluginSpec { key: "limit-conn", name: "Concurrency Limit", resources: &[Route, GlobalRule, Consumer, ConsumerGroup] },
    PluginSpec { key: "cors", name: "CORS", resources: &[Route, GlobalRule] },
    PluginSpec { key: "proxy-rewrite", name: "Proxy Rewrite", resources: &[Route] },
    PluginSpec { key: "response-rewrite", name: "Response Rewrite", resources: &[Route, GlobalRule] },
    PluginSpec { key: "gzip", name: "Gzip", resources: &[Route, GlobalRule] },
    PluginSpec { key: "prometheus", name: "Prometheus", resources: &[Route, GlobalRule] },
    PluginSpec { key: "real-ip", name: "Real IP", resources: &[Route, GlobalRule] },
    PluginSpec { key: "api-breaker", name: "Circuit Breaker", resources: &[Route, Upstream] },
];

/// All catalog entries, in display order.
pub fn all() -> &'static [PluginSpec] {
    CATALOG
}

pub fn get(key: &str) -> Option<&'static PluginSpec> {
    CATALOG.iter().find(|p| p.key == key)
}

/// Plugin keys that may be attached to `resource`.
pub fn plugins_for(resource: PluginResourceType) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|p| p.resources.contains(&resource))
        .map(|p| p.key)
        .collect()
}

pub fn is_available_for(key: &str, resource: PluginResourceType) -> bool {
    get(key).is_some_and(|p| p.resources.contains(&resource))
}

/// Display name for a plugin key; unknown keys are shown as-is.
pub fn display_name(key: &str) -> &str {
    get(key).map_or(key, |p| p.name)
}
