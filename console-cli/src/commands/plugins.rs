use console_client::{AdminClient, RemoteOwner};
use console_core::{PluginMap, PluginSource, ResourceKind};
use console_plugin::catalog::{self, PluginResourceType};
use console_plugin::{OwnerChange, PluginSetBinding, PluginsPatch, is_plugin_enabled};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Print the plugin table of an owner resource.
pub async fn show(client: &Arc<AdminClient>, kind: ResourceKind, id: &str, all: bool) -> anyhow::Result<()> {
    let owner = RemoteOwner::new(client, kind, id)?;
    let (binding, _patches) = bind(client, &owner).await?;

    println!("{kind}/{id}: {}", describe_source(&binding.mode()));
    let plugins = binding.plugins();
    for line in plugin_lines(&plugins, PluginResourceType::for_kind(kind), all) {
        println!("{line}");
    }
    Ok(())
}

/// Switch a plugin on or off and write the result back to the gateway.
pub async fn toggle(
    client: &Arc<AdminClient>,
    kind: ResourceKind,
    id: &str,
    plugin: &str,
    enabled: bool,
) -> anyhow::Result<()> {
    let owner = RemoteOwner::new(client, kind, id)?;
    if let Some(resource) = PluginResourceType::for_kind(kind)
        && catalog::get(plugin).is_some()
        && !catalog::is_available_for(plugin, resource)
    {
        warn!(plugin, resource = %resource, "plugin is not normally attached to this resource type");
    }

    let (binding, mut patches) = bind(client, &owner).await?;
    binding.set_plugin_enabled(plugin, enabled);

    while let Ok(patch) = patches.try_recv() {
        let doc = owner.apply(&patch).await?;
        let reloaded = binding.owner_changed(doc, OwnerChange::Echo(patch.seq)).await;
        debug!(seq = patch.seq, reloaded, "patch applied");
    }

    let state = if binding.is_enabled(plugin) { "enabled" } else { "disabled" };
    println!(
        "{} {state} on {kind}/{id} ({})",
        catalog::display_name(plugin),
        describe_source(&binding.mode())
    );
    Ok(())
}

async fn bind(
    client: &Arc<AdminClient>,
    owner: &RemoteOwner<'_>,
) -> anyhow::Result<(PluginSetBinding, mpsc::UnboundedReceiver<PluginsPatch>)> {
    let document = owner.document().await?;
    let (tx, rx) = mpsc::unbounded_channel();
    let mut binding = PluginSetBinding::bind(document, client.clone(), tx).await;
    if let Some(resource) = PluginResourceType::for_kind(owner.kind()) {
        binding = binding.with_resource_type(resource);
    }
    Ok((binding, rx))
}

fn describe_source(source: &PluginSource) -> String {
    match source {
        PluginSource::Reference(id) => format!("plugins from plugin_config {id}"),
        PluginSource::Inline(_) => "inline plugins".into(),
        PluginSource::Empty => "no plugins".into(),
    }
}

/// One line per configured plugin, then (with `all`) unconfigured catalog entries.
fn plugin_lines(plugins: &PluginMap, resource: Option<PluginResourceType>, all: bool) -> Vec<String> {
    let mut names: Vec<&str> = plugins.keys().map(String::as_str).collect();
    names.sort_unstable();

    let mut lines: Vec<String> = names
        .iter()
        .map(|name| {
            let state = if is_plugin_enabled(plugins, name, resource) { "on " } else { "off" };
            format!("  [{state}] {name:<24} {}", catalog::display_name(name))
        })
        .collect();

    if let Some(resource) = resource.filter(|_| all) {
        lines.extend(
            catalog::plugins_for(resource)
                .into_iter()
                .filter(|key| !plugins.contains_key(*key))
                .map(|key| format!("  [   ] {key:<24} {}", catalog::display_name(key))),
        );
    }
    lines
}
