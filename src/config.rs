use crate::models::settings::AppSettings;
use dotenv::dotenv;
use log::{debug, info};
use std::path::PathBuf;

/// Overrides `registry_path` from the settings file.
pub const REGISTRY_PATH_ENV: &str = "WALLET_POPUP_REGISTRY";

#[derive(Debug, Clone)]
pub struct Config {
    pub registry_path: PathBuf,
    pub log_filter: String,
    pub switch_after_save: bool,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();
        info!("Loading configuration from settings file and environment variables.");

        let app_settings = AppSettings::load();
        let config = Self::from_settings(&app_settings, std::env::var(REGISTRY_PATH_ENV).ok());

        debug!("Configuration loaded: {:?}", config);
        config
    }

    pub fn from_settings(app_settings: &AppSettings, registry_override: Option<String>) -> Self {
        let registry_path = registry_override
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| app_settings.registry_path.clone());

        Config {
            registry_path: PathBuf::from(registry_path),
            log_filter: app_settings.log_filter.clone(),
            switch_after_save: app_settings.switch_after_save,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(&AppSettings::default(), None)
    }
}

/// Get the configuration directory path
pub fn get_config_dir() -> PathBuf {
    let home_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home_dir.join(".wallet-popup")
}
