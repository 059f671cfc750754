use crate::owner::{OwnerDocument, PluginMap, PluginOwner};
use crate::resource::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Consumer definition — APISIX-compatible.
/// Keyed by `username` rather than `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consumer {
    pub username: String,

    /// Plugins with consumer-specific config (e.g. key-auth key).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginOwner for Consumer {
    fn owner_document(&self) -> OwnerDocument {
        OwnerDocument {
            plugin_config_id: None,
            plugins: self.plugins.clone(),
        }
    }
}

impl Resource for Consumer {
    const KIND: ResourceKind = ResourceKind::Consumers;

    fn id(&self) -> Option<&str> {
        Some(&self.username)
    }

    fn label(&self) -> String {
        self.desc.clone().unwrap_or_default()
    }

    fn update_time(&self) -> Option<i64> {
        self.update_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_consumer_minimal() {
        let c: Consumer = serde_json::from_str(r#"{"username":"bob"}"#).unwrap();
        assert_eq!(c.username, "bob");
        assert!(c.plugins.is_none());
        assert!(c.desc.is_none());
        assert_eq!(c.id(), Some("bob"));
    }

    #[test]
    fn test_consumer_with_basic_auth_is_inline_owner() {
        let c: Consumer = serde_json::from_value(json!({
            "username": "alice",
            "group_id": "vip",
            "plugins": {"basic-auth": {"username": "alice", "password": "pw"}}
        }))
        .unwrap();
        let doc = c.owner_document();
        assert!(doc.plugin_config_id.is_none());
        assert_eq!(doc.source().as_str(), "inline");
        assert_eq!(c.group_id.as_deref(), Some("vip"));
    }
}
