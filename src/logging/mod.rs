//! # Logging
//!
//! Installs an `env_logger` backend for the `log` facade, filtered by a
//! default level plus optional per-feature levels. `RUST_LOG` still applies on
//! top of the configured filters.

pub mod features;

use log::LevelFilter;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use features::LogFeature;

/// Global logging configuration instance
static LOGGING_CONFIG: OnceCell<LogConfig> = OnceCell::new();

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default log level for all modules
    pub level: String,
    /// Feature name (`schema`, `permissions`, `config`) to log level
    pub features: HashMap<String, String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            features: HashMap::new(),
        }
    }
}

impl LogConfig {
    /// Checks every level and feature name.
    ///
    /// # Errors
    /// Returns `LoggingError::Config` naming the first bad entry.
    pub fn validate(&self) -> Result<(), LoggingError> {
        parse_level(&self.level)?;
        for (feature, level) in &self.features {
            if LogFeature::from_name(feature).is_none() {
                return Err(LoggingError::Config(format!("Unknown log feature: {}", feature)));
            }
            parse_level(level)?;
        }
        Ok(())
    }
}

/// Parses a level name, case-insensitively.
///
/// # Errors
/// Returns `LoggingError::Config` for anything but TRACE, DEBUG, INFO, WARN,
/// ERROR or OFF.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    match level.to_ascii_uppercase().as_str() {
        "TRACE" => Ok(LevelFilter::Trace),
        "DEBUG" => Ok(LevelFilter::Debug),
        "INFO" => Ok(LevelFilter::Info),
        "WARN" => Ok(LevelFilter::Warn),
        "ERROR" => Ok(LevelFilter::Error),
        "OFF" => Ok(LevelFilter::Off),
        _ => Err(LoggingError::Config(format!("Invalid log level: {}", level))),
    }
}

pub struct LoggingSystem;

impl LoggingSystem {
    /// Initialize the logging system with default configuration
    pub fn init_default() -> Result<(), LoggingError> {
        Self::init_with_config(&LogConfig::default())
    }

    /// Initialize the logging system with a custom configuration
    ///
    /// # Errors
    /// `LoggingError::AlreadyInitialized` on any call after the first,
    /// `LoggingError::Config` for invalid levels and `LoggingError::Init` if
    /// another logger was installed outside this module.
    pub fn init_with_config(config: &LogConfig) -> Result<(), LoggingError> {
        config.validate()?;

        let mut builder = env_logger::Builder::new();
        builder.filter_level(parse_level(&config.level)?);
        for (feature, level) in &config.features {
            if let Some(feature) = LogFeature::from_name(feature) {
                builder.filter_module(feature.target(), parse_level(level)?);
            }
        }
        builder.parse_default_env();

        // The config is only recorded once the logger is actually installed,
        // so a failed install leaves the system uninitialized.
        let mut installed = false;
        LOGGING_CONFIG.get_or_try_init(|| {
            builder
                .try_init()
                .map_err(|e| LoggingError::Init(e.to_string()))?;
            installed = true;
            Ok::<_, LoggingError>(config.clone())
        })?;
        if installed {
            Ok(())
        } else {
            Err(LoggingError::AlreadyInitialized)
        }
    }

    /// Like [`LoggingSystem::init_with_config`], but a previous
    /// initialization is not an error. A foreign logger still is.
    pub fn ensure_initialized(config: &LogConfig) -> Result<(), LoggingError> {
        match Self::init_with_config(config) {
            Err(LoggingError::AlreadyInitialized) => Ok(()),
            other => other,
        }
    }

    pub fn is_initialized() -> bool {
        LOGGING_CONFIG.get().is_some()
    }

    /// Get the configuration the logging system was initialized with
    pub fn get_config() -> Option<LogConfig> {
        LOGGING_CONFIG.get().cloned()
    }
}

/// Logging system errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logging system already initialized")]
    AlreadyInitialized,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Failed to install logger: {0}")]
    Init(String),
}
