use std::path::Path;
use std::sync::Arc;

use crate::config::FieldPermConfig;
use crate::error::FieldPermResult;
use crate::logging::LoggingSystem;
use crate::permissions::{AccessError, AccessEvaluator, Action, Actor, FieldPermissionResult, Record};
use crate::schema::{load_record_types_from_file, RecordType, SchemaRegistry};
use crate::log_schema_info;

/// Ties configuration, declared record types and the access evaluator
/// together.
///
/// Building the engine is the initialization phase: every configured record
/// type is declared before the engine is returned, and queries only read
/// from it afterwards.
///
/// # Examples
///
/// ```rust
/// use fieldperm::{FieldAccessEngine, FieldPermConfig};
/// use fieldperm::permissions::{Action, GrantSet};
/// use fieldperm::schema::{FieldDescriptor, RecordType};
///
/// let engine = FieldAccessEngine::from_config(FieldPermConfig::default()).unwrap();
/// let document = engine
///     .declare(
///         RecordType::new("app", "document")
///             .with_field(FieldDescriptor::primary_key("id"))
///             .with_field(FieldDescriptor::new("title").with_label("Title"))
///             .with_exclusions(Vec::<String>::new()),
///     )
///     .unwrap();
///
/// let actor = GrantSet::new().with_grant("app.change_document_title_field");
/// assert!(engine
///     .has_access_to_field(&document, "title", &actor, &Action::Change)
///     .unwrap());
/// ```
pub struct FieldAccessEngine {
    config: FieldPermConfig,
    registry: SchemaRegistry,
    evaluator: AccessEvaluator,
}

impl FieldAccessEngine {
    /// Builds an engine: validates the configuration and declares every
    /// record type found in the configured schema files.
    ///
    /// Logging is not touched; see [`FieldAccessEngine::from_config_file`].
    ///
    /// # Errors
    /// Returns the first configuration or schema error.
    pub fn from_config(config: FieldPermConfig) -> FieldPermResult<Self> {
        config.validate()?;

        let registry = SchemaRegistry::new();
        for path in config.schema_paths() {
            load_record_types_from_file(&path, &registry)?;
        }
        let declared = registry.len()?;
        log_schema_info!("Field access engine ready with {} record types", declared);

        Ok(Self {
            evaluator: AccessEvaluator::with_unknown_field_policy(config.access.unknown_fields),
            config,
            registry,
        })
    }

    /// Reads a configuration file, applies environment overrides, sets up
    /// logging if nothing has yet, and builds the engine.
    ///
    /// # Errors
    /// Returns the first configuration, logging or schema error.
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> FieldPermResult<Self> {
        let mut config = FieldPermConfig::from_file(path)?;
        config.apply_env_overrides()?;
        LoggingSystem::ensure_initialized(&config.logging)?;
        Self::from_config(config)
    }

    pub fn config(&self) -> &FieldPermConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn evaluator(&self) -> &AccessEvaluator {
        &self.evaluator
    }

    /// Declares an additional record type.
    pub fn declare(&self, record_type: RecordType) -> FieldPermResult<Arc<RecordType>> {
        Ok(self.registry.declare(record_type)?)
    }

    /// Looks up a declared record type.
    pub fn record_type(&self, scope: &str, name: &str) -> FieldPermResult<Arc<RecordType>> {
        Ok(self.registry.require(scope, name)?)
    }

    /// See [`AccessEvaluator::has_access_to_field`].
    pub fn has_access_to_field<R, A>(
        &self,
        record: &R,
        field_name: &str,
        actor: &A,
        action: &Action,
    ) -> Result<bool, AccessError<A::Error>>
    where
        R: Record + ?Sized,
        A: Actor + ?Sized,
    {
        self.evaluator.has_access_to_field(record, field_name, actor, action)
    }

    /// See [`AccessEvaluator::allowed_fields`].
    pub fn allowed_fields<R, A>(
        &self,
        record: &R,
        actor: &A,
        action: &Action,
    ) -> Result<Vec<String>, AccessError<A::Error>>
    where
        R: Record + ?Sized,
        A: Actor + ?Sized,
    {
        self.evaluator.allowed_fields(record, actor, action)
    }

    /// See [`AccessEvaluator::check_fields`].
    pub fn check_fields<R, A, S>(
        &self,
        record: &R,
        field_names: &[S],
        actor: &A,
        action: &Action,
    ) -> Result<Vec<FieldPermissionResult>, AccessError<A::Error>>
    where
        R: Record + ?Sized,
        A: Actor + ?Sized,
        S: AsRef<str>,
    {
        self.evaluator.check_fields(record, field_names, actor, action)
    }
}
