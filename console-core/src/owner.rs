//! Owner documents: the resources that embed or reference a plugin map.
//!
//! Routes, global rules, consumers, and consumer groups all carry either an
//! inline `plugins` map or a `plugin_config_id` pointing at a shared
//! PluginConfig. [`OwnerDocument`] is the slice of such a resource that
//! decides where its plugins live.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Plugin name → plugin configuration blob.
pub type PluginMap = Map<String, Value>;

/// Where an owner's plugin map comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PluginSource {
    /// Fetch the map from the PluginConfig with this id.
    Reference(String),
    /// The map lives on the owner itself.
    Inline(PluginMap),
    /// Nothing configured.
    Empty,
}

impl PluginSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginSource::Reference(_) => "reference",
            PluginSource::Inline(_) => "inline",
            PluginSource::Empty => "empty",
        }
    }
}

impl std::fmt::Display for PluginSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The mode-determining fields of an owner resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnerDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_config_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<PluginMap>,
}

impl OwnerDocument {
    pub fn referencing(id: impl Into<String>) -> Self {
        Self {
            plugin_config_id: Some(id.into()),
            plugins: None,
        }
    }

    pub fn inline(plugins: PluginMap) -> Self {
        Self {
            plugin_config_id: None,
            plugins: Some(plugins),
        }
    }

    /// Read the owner fields out of an arbitrary resource body.
    ///
    /// Accepts the bare resource or the admin API envelope (`{"value": {...}}`).
    /// A non-string id or a non-mapping `plugins` is treated as absent.
    pub fn from_value(body: &Value) -> Self {
        let doc = resource_body(body);
        let plugin_config_id = match doc.get("plugin_config_id") {
            Some(Value::String(s)) => Some(s.clone()),
            // Ids may legitimately be numeric in older gateway versions.
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let plugins = doc.get("plugins").and_then(Value::as_object).cloned();
        Self { plugin_config_id, plugins }
    }

    /// Resolve which source the plugin map must be loaded from.
    pub fn source(&self) -> PluginSource {
        if let Some(id) = self.reference() {
            return PluginSource::Reference(id.to_string());
        }
        match &self.plugins {
            Some(plugins) if !plugins.is_empty() => PluginSource::Inline(plugins.clone()),
            _ => PluginSource::Empty,
        }
    }

    /// The referenced PluginConfig id, if non-empty.
    pub fn reference(&self) -> Option<&str> {
        self.plugin_config_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Implemented by resources whose plugins can be edited through a binding.
pub trait PluginOwner {
    fn owner_document(&self) -> OwnerDocument;
}

impl PluginOwner for Value {
    fn owner_document(&self) -> OwnerDocument {
        OwnerDocument::from_value(self)
    }
}

impl PluginOwner for OwnerDocument {
    fn owner_document(&self) -> OwnerDocument {
        self.clone()
    }
}

/// Strip the admin API envelope, if any.
///
/// Single-resource responses look like `{"key": "...", "value": {...}}`;
/// some proxies in front of the gateway return the resource bare.
pub fn resource_body(body: &Value) -> &Value {
    match body.get("value") {
        Some(inner) if inner.is_object() => inner,
        _ => body,
    }
}

/// Read `plugins` out of a PluginConfig response, in either shape.
pub fn plugins_of(body: &Value) -> PluginMap {
    resource_body(body)
        .get("plugins")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> PluginMap {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn reference_mode_ignores_inline_plugins() {
        let doc = OwnerDocument::from_value(&json!({
            "plugin_config_id": "pc1",
            "plugins": {"cors": {}}
        }));
        assert_eq!(doc.source(), PluginSource::Reference("pc1".into()));
    }

    #[test]
    fn inline_mode_copies_plugins() {
        let doc = OwnerDocument::from_value(&json!({"plugins": {"cors": {}}}));
        assert_eq!(doc.source(), PluginSource::Inline(map(json!({"cors": {}}))));
    }

    #[test]
    fn empty_mode() {
        assert_eq!(OwnerDocument::from_value(&json!({})).source(), PluginSource::Empty);
        assert_eq!(
            OwnerDocument::from_value(&json!({"plugins": {}})).source(),
            PluginSource::Empty
        );
    }

    #[test]
    fn blank_reference_falls_back_to_inline() {
        let doc = OwnerDocument::from_value(&json!({
            "plugin_config_id": "",
            "plugins": {"gzip": {}}
        }));
        assert_eq!(doc.source().as_str(), "inline");
    }

    #[test]
    fn malformed_plugins_is_treated_as_absent() {
        let doc = OwnerDocument::from_value(&json!({"plugins": ["cors"]}));
        assert!(doc.plugins.is_none());
        assert_eq!(doc.source(), PluginSource::Empty);
    }

    #[test]
    fn numeric_reference_is_accepted() {
        let doc = OwnerDocument::from_value(&json!({"plugin_config_id": 42}));
        assert_eq!(doc.reference(), Some("42"));
    }

    #[test]
    fn envelope_is_unwrapped() {
        let doc = OwnerDocument::from_value(&json!({
            "key": "/apisix/routes/r1",
            "value": {"id": "r1", "plugin_config_id": "pc9"}
        }));
        assert_eq!(doc.reference(), Some("pc9"));
    }

    #[test]
    fn plugins_of_accepts_both_shapes() {
        let bare = json!({"id": "pc1", "plugins": {"limit-count": {"count": 2}}});
        let wrapped = json!({"value": {"id": "pc1", "plugins": {"limit-count": {"count": 2}}}});
        assert_eq!(plugins_of(&bare), plugins_of(&wrapped));
        assert_eq!(plugins_of(&bare)["limit-count"]["count"], 2);
        assert!(plugins_of(&json!({"id": "pc1"})).is_empty());
    }
}
