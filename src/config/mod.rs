//! Configuration for the field permission engine
//!
//! Configuration is read from TOML. Every section is optional:
//!
//! ```toml
//! [logging]
//! level = "INFO"
//!
//! [access]
//! unknown_fields = "permissive"
//!
//! [schema]
//! paths = ["schemas/document.json"]
//! ```
//!
//! Relative schema paths are resolved against the directory of the
//! configuration file they were read from.

pub mod error;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use error::ConfigError;

use crate::log_config_info;
use crate::logging::LogConfig;
use crate::permissions::UnknownFieldPolicy;

/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "FIELDPERM_LOG_LEVEL";
/// Environment variable overriding `access.unknown_fields`
pub const ENV_UNKNOWN_FIELDS: &str = "FIELDPERM_UNKNOWN_FIELDS";

/// Access evaluation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// How queries for fields a record type does not have are answered
    pub unknown_fields: UnknownFieldPolicy,
}

/// Schema loading settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Record type definition files, loaded in order
    pub paths: Vec<PathBuf>,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldPermConfig {
    pub logging: LogConfig,
    pub access: AccessConfig,
    pub schema: SchemaConfig,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl FieldPermConfig {
    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError::Toml` for malformed input.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Toml` if it cannot be parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        log_config_info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Adds a record type definition file.
    pub fn with_schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema.paths.push(path.into());
        self
    }

    pub fn with_unknown_field_policy(mut self, policy: UnknownFieldPolicy) -> Self {
        self.access.unknown_fields = policy;
        self
    }

    /// Schema paths, with relative ones resolved against the configuration
    /// file's directory.
    pub fn schema_paths(&self) -> Vec<PathBuf> {
        self.schema
            .paths
            .iter()
            .map(|path| match &self.base_dir {
                Some(base) if path.is_relative() => base.join(path),
                _ => path.clone(),
            })
            .collect()
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    /// Returns `ConfigError::Validation` if an override holds an invalid value.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Applies overrides using `lookup` to read variables.
    ///
    /// # Errors
    /// Returns `ConfigError::Validation` if an override holds an invalid value.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            crate::logging::parse_level(&level)
                .map_err(|e| ConfigError::validation(format!("{ENV_LOG_LEVEL}: {e}")))?;
            self.logging.level = level;
        }
        if let Some(policy) = lookup(ENV_UNKNOWN_FIELDS) {
            self.access.unknown_fields = policy
                .parse()
                .map_err(|e| ConfigError::validation(format!("{ENV_UNKNOWN_FIELDS}: {e}")))?;
        }
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::Validation` for invalid log settings or empty
    /// schema paths.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging
            .validate()
            .map_err(|e| ConfigError::validation(e.to_string()))?;
        if self.schema.paths.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::validation("schema.paths contains an empty path"));
        }
        Ok(())
    }
}
