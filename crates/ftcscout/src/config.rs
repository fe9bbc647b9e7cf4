//! Configuration management for ftcscout.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "ftcscout";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "scouting.db";

/// Largest number of decimal places accepted for averages.
const MAX_PRECISION: usize = 6;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FTCSCOUT_`, sections separated
///    by `__`, e.g. `FTCSCOUT_EXPORT__FILE_PREFIX`)
/// 2. TOML config file at `~/.config/ftcscout/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// CSV export configuration.
    pub export: ExportConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/ftcscout/scouting.db`
    pub database_path: Option<PathBuf>,
}

/// CSV export configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory that receives exported files when no explicit path is given.
    pub directory: PathBuf,
    /// File name prefix; the export time in epoch milliseconds is appended.
    pub file_prefix: String,
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal places used when printing averages.
    pub precision: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_prefix: "ftc-scout-data".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { precision: 1 }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("FTCSCOUT_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.export.file_prefix.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "export.file_prefix must not be empty".to_string(),
            });
        }

        if self.export.file_prefix.contains(&['/', '\\'][..]) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "export.file_prefix must not contain path separators: {}",
                    self.export.file_prefix
                ),
            });
        }

        if self.display.precision > MAX_PRECISION {
            return Err(Error::ConfigValidation {
                message: format!(
                    "display.precision ({}) cannot be greater than {MAX_PRECISION}",
                    self.display.precision
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Build the default export file path for an export taken at `millis`.
    #[must_use]
    pub fn export_path(&self, millis: i64) -> PathBuf {
        self.export
            .directory
            .join(format!("{}-{millis}.csv", self.export.file_prefix))
    }
}
