use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_FETCH_DISTANCE, LOAD_MORE_LINES};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paging: PagingConfig,

    #[serde(default)]
    pub preferences: PreferencesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_fetch_distance")]
    pub fetch_distance: usize,

    #[serde(default = "default_load_more_lines")]
    pub load_more_lines: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Override for the library preferences file; defaults next to the config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            debug!("Loading config from {:?}", config_path);
            let contents = fs::read_to_string(config_path).context("Failed to read config file")?;
            let config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            info!("Config loaded successfully");
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(config_path, contents).context("Failed to write config file")?;

        debug!("Config saved to {:?}", config_path);
        Ok(())
    }

    /// Where per-library view preferences are stored
    pub fn preferences_path(&self) -> Result<PathBuf> {
        match &self.preferences.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("library_preferences.toml")),
        }
    }

    fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("reel"))
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("browse.toml"))
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            fetch_distance: default_fetch_distance(),
            load_more_lines: default_load_more_lines(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// Default value functions
fn default_chunk_size() -> usize { DEFAULT_CHUNK_SIZE }
fn default_fetch_distance() -> usize { DEFAULT_FETCH_DISTANCE }
fn default_load_more_lines() -> usize { LOAD_MORE_LINES }
fn default_log_filter() -> String { "reel_browse=debug".to_string() }
