use crate::owner::{OwnerDocument, PluginMap, PluginOwner};
use crate::resource::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A Route as returned by the admin API.
///
/// Only the fields the console reads are typed; everything else is kept in
/// `extra` so a route can be written back without losing data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,

    /// URI path pattern
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Additional URI patterns (OR match)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uris: Vec<String>,

    /// Allowed HTTP methods (empty = all methods)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_id: Option<String>,

    /// Inline plugin chain: plugin_name -> config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginMap>,

    /// Plugin config reference ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_config_id: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    /// Route status (1 = enabled, 0 = disabled)
    #[serde(default = "default_status")]
    pub status: u8,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Route {
    /// Get all URI patterns for this route.
    pub fn all_uris(&self) -> Vec<&str> {
        self.uri
            .iter()
            .chain(self.uris.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn is_active(&self) -> bool {
        self.status == 1
    }
}

impl PluginOwner for Route {
    fn owner_document(&self) -> OwnerDocument {
        OwnerDocument {
            plugin_config_id: self.plugin_config_id.clone(),
            plugins: self.plugins.clone(),
        }
    }
}

impl Resource for Route {
    const KIND: ResourceKind = ResourceKind::Routes;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.all_uris().join(","),
        }
    }

    fn update_time(&self) -> Option<i64> {
        self.update_time
    }
}

fn default_status() -> u8 {
    1
}
