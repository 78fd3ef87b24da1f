//! User preferences for the tracker, read from an optional JSON file.
//!
//! A missing file is not an error: every field falls back to its default,
//! which stores ledgers under `files/` in the working directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::DEFAULT_CURRENCY_SUFFIX;

pub const CONFIG_FILE_NAME: &str = "finance_tracker.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding ledger files; relative paths resolve against the base directory.
    #[serde(default = "Config::default_storage_dir")]
    pub storage_dir: PathBuf,
    #[serde(default = "Config::default_file_value")]
    pub default_file: String,
    #[serde(default = "Config::default_currency_suffix")]
    pub currency_suffix: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: Self::default_storage_dir(),
            default_file: Self::default_file_value(),
            currency_suffix: Self::default_currency_suffix(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_storage_dir() -> PathBuf {
        PathBuf::from("files")
    }

    pub fn default_file_value() -> String {
        "data.csv".into()
    }

    pub fn default_currency_suffix() -> String {
        DEFAULT_CURRENCY_SUFFIX.into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn storage_root(&self, base: &Path) -> PathBuf {
        if self.storage_dir.is_absolute() {
            self.storage_dir.clone()
        } else {
            base.join(&self.storage_dir)
        }
    }
}

/// Locates and reads the tracker configuration.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: impl Into<PathBuf>) -> Self {
        let base_dir = base.into();
        let config_path = base_dir.join(CONFIG_FILE_NAME);
        Self {
            base_dir,
            config_path,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }
}
