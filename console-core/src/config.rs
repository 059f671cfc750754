use crate::error::{ConsoleError, ConsoleResult};
use figment::{Figment, providers::{Env, Format, Serialized, Yaml}};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection settings for the gateway admin API.
///
/// Loaded once at startup and passed explicitly to whatever needs it; there is
/// no process-wide instance. `settings set` writes a new copy back to disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsoleSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value sent in the `X-API-KEY` header. Empty means "not configured".
    #[serde(default)]
    pub admin_key: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

// ── Defaults ──────────────────────────────────────────────────

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:9180";

fn default_base_url() -> String { DEFAULT_BASE_URL.into() }
fn default_timeout() -> u64 { 30 }

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            admin_key: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

// ── Impls ─────────────────────────────────────────────────────

impl ConsoleSettings {
    /// Load settings from a YAML file + `ANDO_CONSOLE_` env overrides.
    ///
    /// A missing file yields the defaults (first run).
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let settings: ConsoleSettings = Figment::from(Serialized::defaults(ConsoleSettings::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("ANDO_CONSOLE_"))
            .extract()?;
        Ok(settings.normalized())
    }

    /// Persist settings as YAML.
    ///
    /// Written to a `.tmp` sibling first and renamed over the target so a
    /// crash mid-write never leaves a truncated file.
    pub fn save(&self, path: &Path) -> ConsoleResult<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| ConsoleError::Config(e.to_string()))?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension("yaml.tmp");
        std::fs::write(&tmp, yaml)?;
        std::fs::rename(&tmp, path)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }

    /// Whether an admin key has been entered.
    pub fn is_configured(&self) -> bool {
        !self.admin_key.trim().is_empty()
    }

    /// Guard for everything except the settings screen itself.
    pub fn ensure_configured(&self) -> ConsoleResult<()> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(ConsoleError::NotConfigured)
        }
    }

    /// Forget the admin key after the gateway rejected it.
    pub fn clear_admin_key(&mut self) {
        self.admin_key.clear();
    }

    /// Apply a partial update from the settings command.
    pub fn update(&mut self, base_url: Option<String>, admin_key: Option<String>) {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(key) = admin_key {
            self.admin_key = key;
        }
        *self = std::mem::take(self).normalized();
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        self.base_url = if trimmed.is_empty() {
            default_base_url()
        } else {
            trimmed.to_string()
        };
        self
    }
}
