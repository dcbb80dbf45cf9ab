//! Application configuration management.
//!
//! Configuration is stored at `~/.config/gw2view/config.json` and may be
//! overridden by environment variables (a `.env` file is honored when
//! present): `GW2VIEW_OFFLINE` forces offline mode, `GW2VIEW_LANG` sets the
//! locale.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for the config directory path
const APP_NAME: &str = "gw2view";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Serve bundled fixtures instead of hitting the network.
    pub offline: bool,
    /// Locale code for localizable resources (`lang` parameter).
    pub locale: Option<String>,
    /// Keychain name of the last API key used.
    pub last_key_name: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("GW2VIEW_OFFLINE") {
            if let Some(flag) = parse_bool_flag(&value) {
                self.offline = flag;
            }
        }
        if let Ok(lang) = std::env::var("GW2VIEW_LANG") {
            if !lang.trim().is_empty() {
                self.locale = Some(lang.trim().to_string());
            }
        }
    }
}

fn parse_bool_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
