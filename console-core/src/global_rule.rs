use crate::owner::{OwnerDocument, PluginMap, PluginOwner};
use crate::resource::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Global rule — plugins applied to every request regardless of route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginOwner for GlobalRule {
    fn owner_document(&self) -> OwnerDocument {
        OwnerDocument {
            plugin_config_id: None,
            plugins: self.plugins.clone(),
        }
    }
}

impl Resource for GlobalRule {
    const KIND: ResourceKind = ResourceKind::GlobalRules;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        let mut names: Vec<&str> = self
            .plugins
            .iter()
            .flat_map(|p| p.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.join(",")
    }

    fn update_time(&self) -> Option<i64> {
        self.update_time
    }
}
