use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::types::{Permission, RecordType, SchemaError};
use crate::permissions::registration::register_field_permissions;
use crate::{log_schema_debug, log_schema_info, log_schema_warn};

/// Owns every declared record type and its permission registry.
///
/// Declaration is the only write path. It runs under the registry lock and is
/// idempotent, so types may be declared lazily from several threads. Declared
/// types are handed out as `Arc<RecordType>` and are read-only from then on.
pub struct SchemaRegistry {
    types: Mutex<BTreeMap<String, Arc<RecordType>>>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self {
            types: Mutex::new(BTreeMap::new()),
        }
    }
}

fn registry_key(scope: &str, type_name: &str) -> String {
    format!("{}.{}", scope, type_name.to_lowercase())
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a record type: validates it, appends its field permissions
    /// and stores it.
    ///
    /// Declaring an identical type again returns the stored one unchanged.
    ///
    /// # Errors
    /// Returns `SchemaError::Configuration` if the type is malformed, lacks an
    /// exclusion set, or clashes with a different type of the same name.
    pub fn declare(&self, mut record_type: RecordType) -> Result<Arc<RecordType>, SchemaError> {
        record_type.validate()?;
        for name in record_type.unknown_exclusions() {
            log_schema_warn!(
                "Exclusion '{}' on {} does not match any field",
                name,
                record_type.type_name()
            );
        }

        let generated = register_field_permissions(&record_type)?;
        let appended = record_type.append_permissions(generated);
        let key = registry_key(record_type.scope(), record_type.type_name());

        let mut types = self.types.lock().map_err(|_| SchemaError::Lock)?;
        if let Some(existing) = types.get(&key) {
            if **existing == record_type {
                log_schema_debug!("Record type {} already declared", key);
                return Ok(Arc::clone(existing));
            }
            return Err(SchemaError::configuration(
                record_type.type_name(),
                format!("{key} is already declared with a different definition"),
            ));
        }

        let record_type = Arc::new(record_type);
        types.insert(key.clone(), Arc::clone(&record_type));
        log_schema_info!("Declared {} with {} field permissions", key, appended);
        Ok(record_type)
    }

    /// Runs field permission registration again for a declared type. Returns
    /// how many permissions were missing and got appended, which is zero for
    /// any type declared through this registry.
    ///
    /// # Errors
    /// Returns `SchemaError::NotFound` if the type was never declared.
    pub fn refresh_field_permissions(&self, scope: &str, name: &str) -> Result<usize, SchemaError> {
        let key = registry_key(scope, name);
        let mut types = self.types.lock().map_err(|_| SchemaError::Lock)?;
        let existing = types
            .get_mut(&key)
            .ok_or_else(|| SchemaError::NotFound(key.clone()))?;

        let generated = register_field_permissions(existing)?;
        let missing: Vec<Permission> = generated
            .into_iter()
            .filter(|p| !existing.has_permission_codename(&p.codename))
            .collect();
        if missing.is_empty() {
            return Ok(0);
        }

        let appended = Arc::make_mut(existing).append_permissions(missing);
        log_schema_info!("Appended {} missing field permissions to {}", appended, key);
        Ok(appended)
    }

    /// Retrieves a declared record type.
    ///
    /// # Errors
    /// Returns `SchemaError::Lock` if the registry lock is poisoned.
    pub fn get(&self, scope: &str, name: &str) -> Result<Option<Arc<RecordType>>, SchemaError> {
        let types = self.types.lock().map_err(|_| SchemaError::Lock)?;
        Ok(types.get(&registry_key(scope, name)).cloned())
    }

    /// Like [`SchemaRegistry::get`] but a missing type is an error.
    ///
    /// # Errors
    /// Returns `SchemaError::NotFound` if the type was never declared.
    pub fn require(&self, scope: &str, name: &str) -> Result<Arc<RecordType>, SchemaError> {
        self.get(scope, name)?
            .ok_or_else(|| SchemaError::NotFound(registry_key(scope, name)))
    }

    pub fn contains(&self, scope: &str, name: &str) -> Result<bool, SchemaError> {
        Ok(self.get(scope, name)?.is_some())
    }

    /// Lists declared types as `scope.type_name`, sorted.
    pub fn list(&self) -> Result<Vec<String>, SchemaError> {
        let types = self.types.lock().map_err(|_| SchemaError::Lock)?;
        Ok(types.keys().cloned().collect())
    }

    /// Number of declared types.
    ///
    /// # Errors
    /// Returns `SchemaError::Lock` if the registry lock is poisoned.
    pub fn len(&self) -> Result<usize, SchemaError> {
        let types = self.types.lock().map_err(|_| SchemaError::Lock)?;
        Ok(types.len())
    }

    pub fn is_empty(&self) -> Result<bool, SchemaError> {
        Ok(self.len()? == 0)
    }

    /// Every registered permission with its scope, for tooling that
    /// materializes grants. Types are visited in sorted order, permissions in
    /// registration order.
    pub fn all_permissions(&self) -> Result<Vec<(String, Permission)>, SchemaError> {
        let types = self.types.lock().map_err(|_| SchemaError::Lock)?;
        Ok(types
            .values()
            .flat_map(|record_type| {
                record_type
                    .permissions()
                    .iter()
                    .map(|p| (record_type.scope().to_string(), p.clone()))
            })
            .collect())
    }
}
