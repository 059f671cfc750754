pub mod config;
pub mod consumer;
pub mod consumer_group;
pub mod error;
pub mod format;
pub mod global_rule;
pub mod id;
pub mod owner;
pub mod plugin_config;
pub mod resource;
pub mod route;
pub mod ssl;
pub mod upstream;

pub use config::ConsoleSettings;
pub use error::{ConsoleError, ConsoleResult};
pub use owner::{OwnerDocument, PluginMap, PluginOwner, PluginSource};
pub use resource::ResourceKind;
pub use route::Route;
