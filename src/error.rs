use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::schema::types::SchemaError;

/// Unified error type for setting up the engine.
///
/// Access queries are not covered here: they return
/// [`AccessError`](crate::permissions::AccessError), which carries the
/// identity store's own error type.
#[derive(Debug, thiserror::Error)]
pub enum FieldPermError {
    /// Errors related to record type declaration and loading
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Errors related to configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors related to logging setup
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

pub type FieldPermResult<T> = Result<T, FieldPermError>;
