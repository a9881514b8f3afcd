use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use crate::config::get_config_dir;

// Settings file lives next to the registry snapshot in the config dir
const SETTINGS_FILENAME: &str = "app_settings.json";
const REGISTRY_FILENAME: &str = "networks.json";

pub fn get_settings_path() -> PathBuf {
    get_config_dir().join(SETTINGS_FILENAME)
}

fn default_registry_path() -> String {
    get_config_dir().join(REGISTRY_FILENAME).display().to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// JSON snapshot backing the connection registry.
    #[serde(default = "default_registry_path")]
    pub registry_path: String,

    /// env_logger filter used when RUST_LOG is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Switch to a network right after saving it, unless the command says otherwise.
    #[serde(default)]
    pub switch_after_save: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            registry_path: default_registry_path(),
            log_filter: default_log_filter(),
            switch_after_save: false,
        }
    }
}

impl AppSettings {
    /// Loads settings from the JSON file, or returns default if it doesn't exist or fails.
    pub fn load() -> Self {
        Self::load_from(&get_settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        info!("Attempting to load settings from: {}", path.display());
        match File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read settings file '{}': {}. Using default settings.", path.display(), e);
                    return AppSettings::default();
                }
                match serde_json::from_str(&contents) {
                    Ok(settings) => {
                        info!("Successfully loaded settings from {}", path.display());
                        settings
                    }
                    Err(e) => {
                        warn!("Failed to parse settings file '{}': {}. Using default settings.", path.display(), e);
                        AppSettings::default()
                    }
                }
            }
            Err(_) => {
                info!("Settings file '{}' not found. Using default settings.", path.display());
                AppSettings::default()
            }
        }
    }

    /// Reads only `log_filter`, without logging, so the logger can be set up
    /// before the full load reports on the settings file.
    pub fn stored_log_filter() -> Option<String> {
        Self::stored_log_filter_from(&get_settings_path())
    }

    pub fn stored_log_filter_from(path: &Path) -> Option<String> {
        let contents = std::fs::read_to_string(path).ok()?;
        serde_json::from_str::<AppSettings>(&contents)
            .ok()
            .map(|settings| settings.log_filter)
    }

    /// Saves the current settings to the JSON file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&get_settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        info!("Attempting to save settings to: {}", path.display());
        let json_string = serde_json::to_string_pretty(self)
            .context("Failed to serialize settings to JSON")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create or open settings file for writing: {}", path.display()))?;

        file.write_all(json_string.as_bytes())
            .with_context(|| format!("Failed to write settings to file: {}", path.display()))?;

        info!("Successfully saved settings to {}", path.display());
        Ok(())
    }
}
