pub mod clock;
pub mod config;
pub mod settings;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AppConfig, DEFAULT_WEBHOOK_TIMEOUT};
pub use settings::{ConfigCache, FileSettings, PluginConfig, SettingsSource, StaticSettings};
