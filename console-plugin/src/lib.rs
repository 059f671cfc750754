pub mod binding;
pub mod catalog;
pub mod enablement;
pub mod source;

pub use binding::{OwnerChange, PluginSetBinding, PluginsPatch};
pub use catalog::{PluginResourceType, PluginSpec};
pub use enablement::{is_enabled, is_plugin_enabled, set_enabled, set_plugin_enabled};
pub use source::PluginConfigSource;
