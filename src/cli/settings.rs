use std::env;

use anyhow::Result;

use crate::api::public::config::ConfigResponse;
use crate::core::{FileSettings, SettingsSource};

pub fn run(path: Option<String>) -> Result<()> {
    let path = path
        .or_else(|| env::var("MEETSCHED_SETTINGS_PATH").ok())
        .unwrap_or_else(|| "./settings.json".to_string());

    let config = FileSettings::new(&path).load()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&ConfigResponse::from(&config))?
    );

    Ok(())
}
