use crate::resource::{Resource, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upstream target definition — APISIX-compatible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upstream {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Load balancer type: roundrobin, chash, ewma, least_conn.
    #[serde(default = "default_lb_type", rename = "type")]
    pub lb_type: String,

    /// Nodes, either as `{"host:port": weight}` or a list of node objects.
    #[serde(default)]
    pub nodes: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Upstream {
    pub fn node_count(&self) -> usize {
        match &self.nodes {
            Value::Object(m) => m.len(),
            Value::Array(a) => a.len(),
            _ => 0,
        }
    }
}

impl Resource for Upstream {
    const KIND: ResourceKind = ResourceKind::Upstreams;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn label(&self) -> String {
        let name = self.name.as_deref().unwrap_or_default();
        format!("{name} ({}, {} nodes)", self.lb_type, self.node_count())
            .trim_start()
            .to_string()
    }

    fn update_time(&self) -> Option<i64> {
        self.update_time
    }
}

fn default_lb_type() -> String {
    "roundrobin".to_string()
}
