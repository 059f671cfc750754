use async_trait::async_trait;
use console_core::ConsoleResult;
use serde_json::Value;

/// Where a binding in reference mode fetches PluginConfig documents from.
///
/// Implementations return the response body as-is; both the bare document and
/// the admin API envelope (`{"value": {...}}`) are accepted by the binding.
#[async_trait]
pub trait PluginConfigSource: Send + Sync {
    async fn fetch_plugin_config(&self, id: &str) -> ConsoleResult<Value>;
}
