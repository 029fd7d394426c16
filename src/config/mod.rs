//! Configuration loading and validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// How ties at the last kept decimal place are rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// 0.125 -> 0.12, 0.375 -> 0.38
    #[default]
    HalfEven,
    /// 0.125 -> 0.13
    HalfAwayFromZero,
}

/// Pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Records dated before this day are dropped
    #[serde(default = "default_min_date")]
    pub min_date: NaiveDate,

    /// Highest rank kept per year
    #[serde(default = "default_top_n")]
    pub top_n: u32,

    /// Decimal places for monetary and ratio columns
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,

    #[serde(default)]
    pub rounding: RoundingMode,

    /// Aggregate (genre, year) partitions on the rayon pool
    #[serde(default)]
    pub parallel: bool,
}

fn default_min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default()
}

fn default_top_n() -> u32 {
    5
}

fn default_decimal_places() -> u32 {
    2
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_date: default_min_date(),
            top_n: default_top_n(),
            decimal_places: default_decimal_places(),
            rounding: RoundingMode::default(),
            parallel: false,
        }
    }
}

impl PipelineConfig {
    /// Validate the pipeline settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "top_n must be greater than 0".to_string(),
            ));
        }

        if self.decimal_places > 10 {
            return Err(ConfigError::ValidationError(format!(
                "decimal_places must be at most 10, got {}",
                self.decimal_places
            )));
        }

        Ok(())
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.validate()
    }
}
