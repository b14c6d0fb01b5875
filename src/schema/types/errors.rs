/// Errors raised while declaring or loading record types.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A record type is missing required configuration or is malformed.
    /// Raised at declaration time, never deferred to the first query.
    #[error("Configuration error for {type_name}: {message}")]
    Configuration { type_name: String, message: String },

    /// No record type with this name has been declared in the scope.
    #[error("Record type not found: {0}")]
    NotFound(String),

    /// The registry lock was poisoned by a panicking writer.
    #[error("Failed to acquire schema lock")]
    Lock,

    /// Reading a definition file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A definition file is not valid JSON for a record type.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// Create a configuration error for the given type.
    pub fn configuration<T: Into<String>, M: Into<String>>(type_name: T, message: M) -> Self {
        Self::Configuration {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a declaration-time configuration failure.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
