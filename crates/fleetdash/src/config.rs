//! Configuration management for fleetdash.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::DEFAULT_FILE_NAME;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "fleetdash";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "FLEETDASH_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLEETDASH_`, sections split on `__`,
///    e.g. `FLEETDASH_REPORT__START_YEAR=2026`)
/// 2. TOML config file at `~/.config/fleetdash/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report configuration.
    pub report: ReportConfig,
    /// Export configuration.
    pub export: ExportConfig,
    /// Interactive session configuration.
    pub session: SessionConfig,
}

/// Report-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// First year of the average-age projection.
    pub start_year: i32,
    /// Number of years in the average-age projection.
    pub year_count: u32,
}

/// Export-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where CSV exports are written.
    /// Defaults to `fleet_data.csv` in the current directory.
    pub output_path: Option<PathBuf>,
}

/// Interactive session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Date used as "today" for default exit dates and the change summary.
    /// Defaults to the local date.
    pub today: Option<NaiveDate>,
    /// Prompt shown before each command.
    pub prompt: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            start_year: 2025,
            year_count: 11,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            today: None,
            prompt: "fleet> ".to_string(),
        }
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
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.report.year_count == 0 {
            return Err(Error::ConfigValidation {
                message: "year_count must be greater than 0".to_string(),
            });
        }

        if NaiveDate::from_ymd_opt(self.report.start_year, 1, 1).is_none() {
            return Err(Error::ConfigValidation {
                message: format!("start_year {} is out of range", self.report.start_year),
            });
        }

        if crate::analytics::last_projected_year(self.report.start_year, self.report.year_count)
            .is_none()
        {
            return Err(Error::ConfigValidation {
                message: format!(
                    "{} years from start_year {} runs past the last supported year",
                    self.report.year_count, self.report.start_year
                ),
            });
        }

        if self.session.prompt.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "prompt cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the export path, resolving defaults if not set.
    #[must_use]
    pub fn export_path(&self) -> PathBuf {
        self.export
            .output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE_NAME))
    }

    /// The date the session treats as today.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.session
            .today
            .unwrap_or_else(|| Local::now().date_naive())
    }
}
