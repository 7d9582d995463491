//! services/site/src/config.rs
//!
//! Defines the host's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use portfolio_core::catalog::PriceRange;
use portfolio_core::tasks::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Directory backing local storage; `None` keeps everything in memory.
    pub storage_dir: Option<PathBuf>,
    pub tasks_storage_key: String,
    /// JSON product list replacing the built-in demo catalog.
    pub catalog_path: Option<PathBuf>,
    pub price_range_max: f64,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: None,
            tasks_storage_key: DEFAULT_STORAGE_KEY.to_string(),
            catalog_path: None,
            price_range_max: PriceRange::DEFAULT_MAX,
            log_level: Level::INFO,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to keep tests hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Storage ---
        let storage_dir = lookup("STORAGE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let tasks_storage_key = match lookup("TASKS_STORAGE_KEY") {
            Some(key) if key.trim().is_empty() => {
                return Err(ConfigError::InvalidValue(
                    "TASKS_STORAGE_KEY".to_string(),
                    "the key must not be empty".to_string(),
                ))
            }
            Some(key) => key,
            None => defaults.tasks_storage_key,
        };

        // --- Catalog ---
        let catalog_path = lookup("CATALOG_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let price_range_max = match lookup("PRICE_RANGE_MAX") {
            Some(raw) => {
                let value = raw.parse::<f64>().map_err(|e| {
                    ConfigError::InvalidValue("PRICE_RANGE_MAX".to_string(), e.to_string())
                })?;
                if !(value.is_finite() && value > 0.0) {
                    return Err(ConfigError::InvalidValue(
                        "PRICE_RANGE_MAX".to_string(),
                        format!("'{}' must be a positive number", raw),
                    ));
                }
                value
            }
            None => defaults.price_range_max,
        };

        // --- Logging ---
        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            storage_dir,
            tasks_storage_key,
            catalog_path,
            price_range_max,
            log_level,
        })
    }
}
