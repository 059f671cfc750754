use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Admin API resource collections managed by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Routes,
    Upstreams,
    Consumers,
    ConsumerGroups,
    Ssls,
    PluginConfigs,
    GlobalRules,
}

impl ResourceKind {
    /// Collection segment under `/apisix/admin/`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Routes => "routes",
            ResourceKind::Upstreams => "upstreams",
            ResourceKind::Consumers => "consumers",
            ResourceKind::ConsumerGroups => "consumer_groups",
            ResourceKind::Ssls => "ssls",
            ResourceKind::PluginConfigs => "plugin_configs",
            ResourceKind::GlobalRules => "global_rules",
        }
    }

    pub fn all() -> &'static [ResourceKind] {
        &[
            ResourceKind::Routes,
            ResourceKind::Upstreams,
            ResourceKind::Consumers,
            ResourceKind::ConsumerGroups,
            ResourceKind::Ssls,
            ResourceKind::PluginConfigs,
            ResourceKind::GlobalRules,
        ]
    }

    /// Prefix used when the console has to invent an id.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ResourceKind::Routes => "route",
            ResourceKind::Upstreams => "upstream",
            ResourceKind::Consumers => "consumer",
            ResourceKind::ConsumerGroups => "consumer_group",
            ResourceKind::Ssls => "ssl",
            ResourceKind::PluginConfigs => "plugin_config",
            ResourceKind::GlobalRules => "global_rule",
        }
    }

    /// Whether documents of this kind carry an editable plugin map.
    pub fn owns_plugins(&self) -> bool {
        matches!(
            self,
            ResourceKind::Routes
                | ResourceKind::Consumers
                | ResourceKind::ConsumerGroups
                | ResourceKind::PluginConfigs
                | ResourceKind::GlobalRules
        )
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ResourceKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == normalized || k.id_prefix() == normalized)
            .ok_or_else(|| format!("unknown resource kind: {s}"))
    }
}

/// A typed admin API resource.
pub trait Resource: DeserializeOwned + Serialize {
    const KIND: ResourceKind;

    /// Identifier used in the resource URL.
    fn id(&self) -> Option<&str>;

    /// Short human label shown next to the id in listings.
    fn label(&self) -> String;

    /// Last update time as reported by the gateway (unix seconds).
    fn update_time(&self) -> Option<i64>;
}
