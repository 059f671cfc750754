use crate::owner::{OwnerDocument, PluginMap, PluginOwner};
use crate::resource::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Consumer group — a plugin set shared by every consumer in the group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsumerGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginOwner for ConsumerGroup {
    fn owner_document(&self) -> OwnerDocument {
        OwnerDocument {
            plugin_config_id: None,
            plugins: self.plugins.clone(),
        }
    }
}

impl Resource for ConsumerGroup {
    const KIND: ResourceKind = ResourceKind::ConsumerGroups;

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
