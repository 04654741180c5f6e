//! Public types for the config API
use serde::{Deserialize, Serialize};

use crate::core::PluginConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub webhook_url: String,
    pub open_in_new_tab: bool,
}

impl From<&PluginConfig> for ConfigResponse {
    fn from(config: &PluginConfig) -> Self {
        Self {
            webhook_url: config.webhook_url.clone(),
            open_in_new_tab: config.open_in_new_tab,
        }
    }
}
