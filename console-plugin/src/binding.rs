//! Two-way binding between an owner document and a plugin editor.
//!
//! The binding loads the owner's plugin map (inline copy, or a fetch of the
//! referenced PluginConfig), hands snapshots to the editor, and pushes every
//! edit back to the owner as a [`PluginsPatch`]. Each patch carries a sequence
//! number; when the owner reports a change caused by one of those patches the
//! binding does not reload, so its own writes never bounce back over newer
//! local state.

use crate::catalog::PluginResourceType;
use crate::enablement;
use crate::source::PluginConfigSource;
use arc_swap::ArcSwap;
use console_core::owner::plugins_of;
use console_core::{OwnerDocument, PluginMap, PluginSource};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Change notification sent to the owner after every local edit.
///
/// The shape is the same in inline and reference mode; the owner decides
/// whether to store the map on itself or in the referenced PluginConfig.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginsPatch {
    pub seq: u64,
    pub plugins: PluginMap,
}

/// Why the owner document changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerChange {
    /// Edited elsewhere (another form field, a refresh from the gateway, ...).
    External,
    /// The owner applied the patch with this sequence number.
    Echo(u64),
}

pub struct PluginSetBinding {
    source: Arc<dyn PluginConfigSource>,
    notify: mpsc::UnboundedSender<PluginsPatch>,
    plugins: ArcSwap<PluginMap>,
    owner: Mutex<OwnerDocument>,
    /// Sequence number of the last patch sent to the owner.
    last_issued: AtomicU64,
    /// Bumped by every load and local write; a fetch only lands if it is still current.
    generation: AtomicU64,
    /// Resource type of the owner, when known. Decides how `basic-auth` is toggled.
    resource: Option<PluginResourceType>,
}

impl PluginSetBinding {
    /// Create a binding and run the initial load.
    pub async fn bind(
        owner: OwnerDocument,
        source: Arc<dyn PluginConfigSource>,
        notify: mpsc::UnboundedSender<PluginsPatch>,
    ) -> Self {
        let binding = Self {
            source,
            notify,
            plugins: ArcSwap::from_pointee(PluginMap::new()),
            owner: Mutex::new(owner),
            last_issued: AtomicU64::new(0),
            generation: AtomicU64::new(0),
            resource: None,
        };
        binding.load().await;
        binding
    }

    /// Record the owner's resource type.
    pub fn with_resource_type(mut self, resource: PluginResourceType) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn resource_type(&self) -> Option<PluginResourceType> {
        self.resource
    }

    /// Current plugin map.
    pub fn plugins(&self) -> Arc<PluginMap> {
        self.plugins.load_full()
    }

    /// Source the current owner state resolves to.
    pub fn mode(&self) -> PluginSource {
        self.owner_snapshot().source()
    }

    pub fn owner_snapshot(&self) -> OwnerDocument {
        match self.owner.lock() {
            Ok(owner) => owner.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Sequence number of the most recent patch, 0 before any edit.
    pub fn last_issued(&self) -> u64 {
        self.last_issued.load(Ordering::Acquire)
    }

    /// Load the plugin map for the current owner state.
    ///
    /// Never fails: a fetch error leaves the map empty. If another load or a
    /// local edit starts while a fetch is in flight, the fetch result is
    /// dropped.
    pub async fn load(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        match self.owner_snapshot().source() {
            PluginSource::Reference(id) => {
                let loaded = match self.source.fetch_plugin_config(&id).await {
                    Ok(body) => plugins_of(&body),
                    Err(e) => {
                        warn!(plugin_config_id = %id, error = %e, "failed to load plugin config, using empty plugin set");
                        PluginMap::new()
                    }
                };
                if self.generation.load(Ordering::Acquire) != generation {
                    debug!(plugin_config_id = %id, "discarding stale plugin config load");
                    return;
                }
                debug!(plugin_config_id = %id, plugins = loaded.len(), "plugin config loaded");
                self.plugins.store(Arc::new(loaded));
            }
            PluginSource::Inline(plugins) => {
                debug!(plugins = plugins.len(), "inline plugins loaded");
                self.plugins.store(Arc::new(plugins));
            }
            PluginSource::Empty => {
                self.plugins.store(Arc::new(PluginMap::new()));
            }
        }
    }

    /// Tell the binding the owner document changed.
    ///
    /// Reloads when the reference or the inline plugins differ from what the
    /// binding last saw, unless the change is the echo of one of the binding's
    /// own patches. Returns whether a reload ran.
    pub async fn owner_changed(&self, owner: OwnerDocument, change: OwnerChange) -> bool {
        let last_issued = self.last_issued();
        let previous = {
            let mut current = match self.owner.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let OwnerChange::Echo(seq) = change
                && seq != 0
                && seq <= last_issued
            {
                if seq == last_issued {
                    *current = owner;
                }
                debug!(seq, last_issued, "owner change is an echo of a local edit, not reloading");
                return false;
            }
            std::mem::replace(&mut *current, owner.clone())
        };

        if previous.reference() == owner.reference() && previous.plugins == owner.plugins {
            return false;
        }

        if previous.reference() != owner.reference() {
            debug!(
                from = previous.reference().unwrap_or("-"),
                to = owner.reference().unwrap_or("-"),
                "owner switched plugin source"
            );
            self.plugins.store(Arc::new(PluginMap::new()));
        }

        self.load().await;
        true
    }

    /// Replace the whole plugin map and notify the owner. Returns the patch sequence number.
    pub fn update_plugins(&self, plugins: &PluginMap) -> u64 {
        let seq = self.last_issued.fetch_add(1, Ordering::AcqRel) + 1;
        // A local edit supersedes any fetch still in flight.
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.plugins.store(Arc::new(plugins.clone()));

        let patch = PluginsPatch {
            seq,
            plugins: plugins.clone(),
        };
        if self.notify.send(patch).is_err() {
            warn!(seq, "owner stopped listening for plugin updates");
        }
        seq
    }

    /// Replace a single plugin's configuration.
    pub fn update_plugin(&self, name: &str, config: Value) -> u64 {
        let mut plugins = (*self.plugins()).clone();
        plugins.insert(name.to_string(), config);
        self.update_plugins(&plugins)
    }

    /// Drop a plugin from the set entirely.
    pub fn remove_plugin(&self, name: &str) -> u64 {
        let mut plugins = (*self.plugins()).clone();
        plugins.remove(name);
        self.update_plugins(&plugins)
    }

    /// Switch a plugin on or off, persisting the `_meta.disable` marker.
    pub fn set_plugin_enabled(&self, name: &str, enabled: bool) -> u64 {
        let mut plugins = (*self.plugins()).clone();
        enablement::set_plugin_enabled(&mut plugins, name, enabled, self.resource);
        self.update_plugins(&plugins)
    }

    /// Effective on/off state of `name` in the current map.
    pub fn is_enabled(&self, name: &str) -> bool {
        enablement::is_plugin_enabled(&self.plugins(), name, self.resource)
    }
}

impl std::fmt::Debug for PluginSetBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginSetBinding")
            .field("owner", &self.owner_snapshot())
            .field("resource", &self.resource)
            .field("plugins", &self.plugins())
            .field("last_issued", &self.last_issued())
            .finish()
    }
}
