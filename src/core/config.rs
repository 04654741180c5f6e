use std::env;
use std::time::Duration;

/// Outbound webhook timeout used when `MEETSCHED_WEBHOOK_TIMEOUT_SECS` is unset.
pub const DEFAULT_WEBHOOK_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub mattermost_url: String,
    pub mattermost_token: String,
    pub settings_path: String,
    pub webhook_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mattermost_url =
            env::var("MEETSCHED_MATTERMOST_URL").expect("Missing env var MEETSCHED_MATTERMOST_URL");
        let mattermost_token = env::var("MEETSCHED_MATTERMOST_TOKEN")
            .expect("Missing env var MEETSCHED_MATTERMOST_TOKEN");
        let settings_path =
            env::var("MEETSCHED_SETTINGS_PATH").unwrap_or_else(|_| "./settings.json".to_string());
        let webhook_timeout = env::var("MEETSCHED_WEBHOOK_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_WEBHOOK_TIMEOUT);

        Self {
            mattermost_url: mattermost_url.trim_end_matches('/').to_string(),
            mattermost_token,
            settings_path,
            webhook_timeout,
        }
    }
}
