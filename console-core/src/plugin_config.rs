use crate::owner::{OwnerDocument, PluginMap, PluginOwner};
use crate::resource::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Reusable plugin config set — APISIX-compatible.
/// Can be referenced by multiple routes to share plugin configurations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    #[serde(default)]
    pub plugins: PluginMap,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginOwner for PluginConfig {
    fn owner_document(&self) -> OwnerDocument {
        OwnerDocument::inline(self.plugins.clone())
    }
}

impl Resource for PluginConfig {
    const KIND: ResourceKind = ResourceKind::PluginConfigs;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        self.desc.clone().unwrap_or_default()
    }

    fn update_time(&self) -> Option<i64> {
        self.update_time
    }
}
