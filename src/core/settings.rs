//! Plugin settings and the process-wide settings cache.
//!
//! Settings are read once and shared read-only by every request. A
//! configuration change drops the cached copy wholesale and the next
//! reader loads a fresh one.
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};

/// Settings an operator controls from the host's plugin configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(rename = "WebhookURL", default)]
    pub webhook_url: String,
    #[serde(rename = "OpenInNewTab", default = "default_open_in_new_tab")]
    pub open_in_new_tab: bool,
}

fn default_open_in_new_tab() -> bool {
    true
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            open_in_new_tab: default_open_in_new_tab(),
        }
    }
}

impl PluginConfig {
    pub fn is_webhook_configured(&self) -> bool {
        !self.webhook_url.trim().is_empty()
    }
}

/// Where plugin settings come from.
pub trait SettingsSource: Send + Sync {
    fn load(&self) -> Result<PluginConfig>;
}

/// Reads settings from a JSON file on every load.
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SettingsSource for FileSettings {
    fn load(&self) -> Result<PluginConfig> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file {}", self.path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid settings file {}", self.path.display()))?;
        Ok(config)
    }
}

/// Fixed settings, mostly useful for tests.
pub struct StaticSettings(pub PluginConfig);

impl SettingsSource for StaticSettings {
    fn load(&self) -> Result<PluginConfig> {
        Ok(self.0.clone())
    }
}

/// Single-writer, many-reader cache over a [`SettingsSource`].
pub struct ConfigCache {
    source: Arc<dyn SettingsSource>,
    current: ArcSwapOption<PluginConfig>,
}

impl ConfigCache {
    pub fn new(source: Arc<dyn SettingsSource>) -> Self {
        Self {
            source,
            current: ArcSwapOption::empty(),
        }
    }

    /// Returns the cached settings, loading them on first use.
    ///
    /// A failed load is logged and answered with the defaults, which are
    /// not cached so the next call retries the source.
    pub fn get(&self) -> Arc<PluginConfig> {
        if let Some(config) = self.current.load_full() {
            return config;
        }

        match self.source.load() {
            Ok(config) => {
                let config = Arc::new(config);
                self.current.store(Some(Arc::clone(&config)));
                config
            }
            Err(err) => {
                tracing::error!("Failed to load plugin settings: {:#}", err);
                Arc::new(PluginConfig::default())
            }
        }
    }

    /// Drops the cached settings so the next `get` reloads them.
    pub fn invalidate(&self) {
        self.current.store(None);
        tracing::info!("Plugin settings cache cleared");
    }
}
