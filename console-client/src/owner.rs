//! The owner side of a plugin binding, backed by the gateway.
//!
//! A [`RemoteOwner`] is a route, consumer, consumer group, or global rule on the
//! gateway. It turns binding patches into PUTs: inline owners are rewritten
//! with the new `plugins`, owners that reference a PluginConfig have that
//! document updated instead.

use crate::client::AdminClient;
use console_core::owner::resource_body;
use console_core::{ConsoleError, ConsoleResult, OwnerDocument, ResourceKind};
use console_plugin::PluginsPatch;
use serde_json::{Value, json};
use tracing::info;

/// Fields the gateway manages itself and rejects or ignores on write.
const READ_ONLY_FIELDS: &[&str] = &["create_time", "update_time"];

pub struct RemoteOwner<'a> {
    client: &'a AdminClient,
    kind: ResourceKind,
    id: String,
}

impl<'a> RemoteOwner<'a> {
    pub fn new(client: &'a AdminClient, kind: ResourceKind, id: impl Into<String>) -> ConsoleResult<Self> {
        if !kind.owns_plugins() {
            return Err(ConsoleError::Config(format!("{kind} do not carry plugins")));
        }
        Ok(Self {
            client,
            kind,
            id: id.into(),
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current resource body, without the admin API envelope.
    pub async fn fetch(&self) -> ConsoleResult<Value> {
        let body = self.client.resource(self.kind).get(&self.id).await?;
        Ok(resource_body(&body).clone())
    }

    pub async fn document(&self) -> ConsoleResult<OwnerDocument> {
        Ok(OwnerDocument::from_value(&self.fetch().await?))
    }

    /// Persist a patch from the binding and return the owner state afterwards.
    pub async fn apply(&self, patch: &PluginsPatch) -> ConsoleResult<OwnerDocument> {
        let mut body = self.fetch().await?;
        let doc = OwnerDocument::from_value(&body);

        if let Some(pc_id) = doc.reference() {
            let configs = self.client.resource(ResourceKind::PluginConfigs);
            let mut config = match configs.get(pc_id).await {
                Ok(found) => resource_body(&found).clone(),
                Err(ConsoleError::NotFound(_)) => json!({ "id": pc_id }),
                Err(e) => return Err(e),
            };
            set_plugins(&mut config, patch);
            configs.update(pc_id, &config).await?;
            info!(
                owner = %self.kind, id = %self.id, plugin_config_id = pc_id,
                seq = patch.seq, plugins = patch.plugins.len(),
                "plugin config updated"
            );
            return Ok(doc);
        }

        set_plugins(&mut body, patch);
        let saved = self.client.resource(self.kind).update(&self.id, &body).await?;
        info!(
            owner = %self.kind, id = %self.id,
            seq = patch.seq, plugins = patch.plugins.len(),
            "owner plugins updated"
        );

        // Prefer what the gateway echoed back; fall back to what was sent.
        let saved = resource_body(&saved);
        if saved.get("plugins").is_some() {
            Ok(OwnerDocument::from_value(saved))
        } else {
            Ok(OwnerDocument::from_value(&body))
        }
    }
}

fn set_plugins(doc: &mut Value, patch: &PluginsPatch) {
    if !doc.is_object() {
        *doc = json!({});
    }
    if let Value::Object(map) = doc {
        for field in READ_ONLY_FIELDS {
            map.remove(*field);
        }
        map.insert("plugins".into(), Value::Object(patch.plugins.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_plugins_replaces_map_and_strips_timestamps() {
        let mut doc = json!({
            "id": "r1", "uri": "/a", "create_time": 1, "update_time": 2,
            "plugins": {"cors": {}}
        });
        let patch = PluginsPatch {
            seq: 1,
            plugins: json!({"gzip": {}}).as_object().cloned().unwrap(),
        };
        set_plugins(&mut doc, &patch);
        assert_eq!(doc, json!({"id": "r1", "uri": "/a", "plugins": {"gzip": {}}}));
    }

    #[test]
    fn upstreams_are_not_plugin_owners() {
        let client = AdminClient::new(&console_core::ConsoleSettings::default()).unwrap();
        assert!(RemoteOwner::new(&client, ResourceKind::Upstreams, "u1").is_err());
        assert!(RemoteOwner::new(&client, ResourceKind::GlobalRules, "1").is_ok());
    }
}
