//! Configuration management for regdesk.
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
const DATA_DIR_NAME: &str = "regdesk";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "regdesk.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `REGDESK_`, sections separated by
///    `__`, e.g. `REGDESK_DASHBOARD__PAGE_SIZE`)
/// 2. TOML config file at `~/.config/regdesk/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Dashboard configuration.
    pub dashboard: DashboardConfig,
    /// Form validation limits.
    pub validation: ValidationConfig,
    /// Login configuration.
    pub auth: AuthConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/regdesk/regdesk.db`
    pub database_path: Option<PathBuf>,
}

/// Dashboard view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows per page in the registrations table.
    pub page_size: usize,
    /// Entries shown in top-N charts.
    pub top_n: usize,
    /// Rows shown in the recent registrations table.
    pub recent_limit: usize,
}

/// Limits applied by the form validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Registrants must be younger than this many years.
    pub max_age_years: u32,
    /// Minimum trimmed name length.
    pub min_name_length: usize,
    /// Minimum trimmed first address line length.
    pub min_address_length: usize,
}

/// Static login credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Accepted username.
    pub username: String,
    /// Accepted password, compared verbatim. Never serialized.
    #[serde(skip_serializing)]
    pub password: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            top_n: 10,
            recent_limit: 10,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_age_years: 18,
            min_name_length: 2,
            min_address_length: 5,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `REGDESK_`)
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
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("REGDESK_").split("__"));

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
        if self.dashboard.page_size == 0 {
            return Err(Error::ConfigValidation {
                message: "page_size must be greater than 0".to_string(),
            });
        }

        if self.dashboard.top_n == 0 {
            return Err(Error::ConfigValidation {
                message: "top_n must be greater than 0".to_string(),
            });
        }

        if self.validation.max_age_years == 0 {
            return Err(Error::ConfigValidation {
                message: "max_age_years must be greater than 0".to_string(),
            });
        }

        if self.auth.username.is_empty() || self.auth.password.is_empty() {
            return Err(Error::ConfigValidation {
                message: "auth username and password cannot be empty".to_string(),
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
}
