//! Feature-specific logging macros
//!
//! Each feature logs under its own target so it can be filtered separately,
//! e.g. `RUST_LOG=fieldperm::permissions=debug`.

/// Feature categories for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFeature {
    Schema,
    Permissions,
    Config,
}

impl LogFeature {
    /// Get the target string for this feature
    pub fn target(&self) -> &'static str {
        match self {
            LogFeature::Schema => "fieldperm::schema",
            LogFeature::Permissions => "fieldperm::permissions",
            LogFeature::Config => "fieldperm::config",
        }
    }

    /// Looks a feature up by the name used in configuration files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "schema" => Some(LogFeature::Schema),
            "permissions" => Some(LogFeature::Permissions),
            "config" => Some(LogFeature::Config),
            _ => None,
        }
    }
}

// Schema-specific logging macros
#[macro_export]
macro_rules! log_schema_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "fieldperm::schema", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_schema_info {
    ($($arg:tt)*) => {
        log::info!(target: "fieldperm::schema", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_schema_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "fieldperm::schema", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_schema_error {
    ($($arg:tt)*) => {
        log::error!(target: "fieldperm::schema", $($arg)*)
    };
}

// Permission-specific logging macros
#[macro_export]
macro_rules! log_permissions_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "fieldperm::permissions", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_permissions_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "fieldperm::permissions", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_permissions_error {
    ($($arg:tt)*) => {
        log::error!(target: "fieldperm::permissions", $($arg)*)
    };
}

// Config-specific logging macros
#[macro_export]
macro_rules! log_config_info {
    ($($arg:tt)*) => {
        log::info!(target: "fieldperm::config", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_names_resolve_to_targets() {
        assert_eq!(
            LogFeature::from_name("Permissions").map(|f| f.target()),
            Some("fieldperm::permissions")
        );
        assert_eq!(LogFeature::from_name("network"), None);
    }

    #[test]
    fn every_macro_expands() {
        let name = "document";
        crate::log_schema_debug!("schema {}", name);
        crate::log_schema_info!("schema {}", name);
        crate::log_schema_warn!("schema {}", name);
        crate::log_schema_error!("schema {}", name);
        crate::log_permissions_debug!("permissions {}", name);
        crate::log_permissions_warn!("permissions {}", name);
        crate::log_permissions_error!("permissions {}", name);
        crate::log_config_info!("config {}", name);
    }
}
