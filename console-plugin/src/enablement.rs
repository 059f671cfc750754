//! On/off state of a plugin, encoded in its configuration blob.
//!
//! A plugin is switched off with `_meta.disable = true` inside its own config.
//! `basic-auth` is the exception on resources that can carry
//! `consumer-restriction`: there the restriction next to it decides whether
//! basic auth is in force. On a consumer `basic-auth` holds credentials and
//! follows the plain rule.

use crate::catalog::{self, PluginResourceType};
use console_core::PluginMap;
use serde_json::{Map, Value};
use tracing::warn;

pub const META_KEY: &str = "_meta";
pub const DISABLE_KEY: &str = "disable";

pub const BASIC_AUTH: &str = "basic-auth";
pub const CONSUMER_RESTRICTION: &str = "consumer-restriction";

/// `consumer-restriction` types that count as "basic auth is on".
const RESTRICTING_TYPES: &[&str] = &["consumer_name", "consumer_group_id"];
const DEFAULT_RESTRICTION_TYPE: &str = "consumer_name";

/// Whether `plugin` is in force for the owner.
///
/// `name` and `siblings` are only needed for plugins whose state is derived
/// from another plugin in the same map.
pub fn is_enabled(blob: Option<&Value>, name: Option<&str>, siblings: Option<&PluginMap>) -> bool {
    if name == Some(BASIC_AUTH)
        && let Some(siblings) = siblings
    {
        return restriction_enforced(siblings.get(CONSUMER_RESTRICTION));
    }

    let Some(Value::Object(blob)) = blob else {
        return false;
    };

    let meta = blob.get(META_KEY);
    if disable_flag(meta) == Some(true) {
        return false;
    }

    if blob.is_empty() {
        return false;
    }

    if blob.len() == 1 && meta.is_some() {
        let meta = meta.and_then(Value::as_object);
        return match meta {
            None => false,
            Some(m) if m.is_empty() => false,
            // Only `disable` is present and it is not `true` (checked above).
            Some(m) if m.len() == 1 && m.contains_key(DISABLE_KEY) => {
                m.get(DISABLE_KEY) == Some(&Value::Bool(false))
            }
            Some(_) => true,
        };
    }

    true
}

/// Whether `basic-auth` on `resource` is governed by `consumer-restriction`.
///
/// An unknown resource type (`None`) keeps the coupling.
pub fn basic_auth_follows_restriction(resource: Option<PluginResourceType>) -> bool {
    resource.is_none_or(|r| catalog::is_available_for(CONSUMER_RESTRICTION, r))
}

/// Convenience over [`is_enabled`] that looks the plugin up in its own map.
pub fn is_plugin_enabled(plugins: &PluginMap, name: &str, resource: Option<PluginResourceType>) -> bool {
    let siblings = basic_auth_follows_restriction(resource).then_some(plugins);
    is_enabled(plugins.get(name), Some(name), siblings)
}

/// Switch a plugin blob on or off in place.
///
/// Non-mapping blobs (or `_meta` values) are replaced with empty mappings.
/// Enabling drops `_meta.disable` and an `_meta` left empty by that, except
/// when the blob would end up with no keys at all: an empty blob reads as
/// "never configured", so it keeps an explicit `disable: false` instead.
pub fn set_enabled(blob: &mut Value, enabled: bool) {
    if !blob.is_object() {
        *blob = Value::Object(Map::new());
    }
    let Value::Object(obj) = blob else {
        return;
    };

    let meta = obj
        .entry(META_KEY)
        .or_insert_with(|| Value::Object(Map::new()));
    if !meta.is_object() {
        *meta = Value::Object(Map::new());
    }
    let Value::Object(meta) = meta else {
        return;
    };

    if !enabled {
        meta.insert(DISABLE_KEY.into(), Value::Bool(true));
        return;
    }

    meta.remove(DISABLE_KEY);
    if !meta.is_empty() {
        return;
    }
    if obj.len() > 1 {
        obj.remove(META_KEY);
    } else {
        let mut marker = Map::new();
        marker.insert(DISABLE_KEY.into(), Value::Bool(false));
        obj.insert(META_KEY.into(), Value::Object(marker));
    }
}

/// Toggle `name` inside a plugin map.
///
/// The plugin's blob is created if missing. For `basic-auth` on a resource
/// that can carry `consumer-restriction`, the restriction blob is toggled
/// instead and `basic-auth` itself is kept in the map so its credentials are
/// not lost.
///
/// Enabling only clears the disable marker. If the restriction's `type` does
/// not restrict consumers (e.g. `route_id`), basic auth still reads as off.
pub fn set_plugin_enabled(
    plugins: &mut PluginMap,
    name: &str,
    enabled: bool,
    resource: Option<PluginResourceType>,
) {
    let coupled = name == BASIC_AUTH && basic_auth_follows_restriction(resource);
    let target = if coupled {
        plugins
            .entry(BASIC_AUTH)
            .or_insert_with(|| Value::Object(Map::new()));
        CONSUMER_RESTRICTION
    } else {
        name
    };

    let blob = plugins
        .entry(target)
        .or_insert_with(|| Value::Object(Map::new()));
    set_enabled(blob, enabled);

    if coupled && enabled && !restriction_enforced(plugins.get(CONSUMER_RESTRICTION)) {
        let kind = plugins[CONSUMER_RESTRICTION].get("type").cloned().unwrap_or(Value::Null);
        warn!(restriction_type = %kind, "consumer-restriction does not restrict consumers, basic-auth stays off");
    }
}

fn disable_flag(meta: Option<&Value>) -> Option<bool> {
    meta?.get(DISABLE_KEY)?.as_bool()
}

fn restriction_enforced(restriction: Option<&Value>) -> bool {
    let Some(Value::Object(restriction)) = restriction else {
        return false;
    };
    if disable_flag(restriction.get(META_KEY)) == Some(true) {
        return false;
    }
    match restriction.get("type") {
        None | Some(Value::Null) => RESTRICTING_TYPES.contains(&DEFAULT_RESTRICTION_TYPE),
        Some(Value::String(t)) => RESTRICTING_TYPES.contains(&t.as_str()),
        Some(_) => false,
    }
}
