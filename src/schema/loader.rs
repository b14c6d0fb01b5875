//! Loading record type definitions from JSON.
//!
//! A definition file holds either a single record type object or an array of
//! them:
//!
//! ```json
//! {
//!   "scope": "assets",
//!   "name": "Document",
//!   "fields": [
//!     {"name": "id", "primary_key": true},
//!     {"name": "title", "label": "Title"}
//!   ],
//!   "permissions": {"exclude": []}
//! }
//! ```
//!
//! The `permissions` object is required even when nothing is excluded.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::registry::SchemaRegistry;
use super::types::{FieldDescriptor, FieldPermissionConfig, Permission, RecordType, SchemaError};
use crate::{log_schema_error, log_schema_info};

/// A record type as written in a definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordTypeDefinition {
    pub scope: String,
    pub name: String,
    // Required; absence is a configuration error, not an empty type
    #[serde(default)]
    pub fields: Option<Vec<FieldDescriptor>>,
    #[serde(default)]
    pub permissions: Option<FieldPermissionConfig>,
    #[serde(default)]
    pub custom_permissions: Vec<Permission>,
}

impl TryFrom<RecordTypeDefinition> for RecordType {
    type Error = SchemaError;

    fn try_from(definition: RecordTypeDefinition) -> Result<Self, Self::Error> {
        let fields = definition.fields.ok_or_else(|| {
            SchemaError::configuration(definition.name.to_lowercase(), "missing field list")
        })?;
        let mut record_type = RecordType::new(definition.scope, definition.name)
            .with_fields(fields)
            .with_field_permissions(definition.permissions);
        record_type.append_permissions(definition.custom_permissions);
        Ok(record_type)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DefinitionFile {
    Many(Vec<RecordTypeDefinition>),
    One(RecordTypeDefinition),
}

/// Parses definitions without declaring them.
///
/// # Errors
/// Returns `SchemaError::Json` if the document is not a definition or a list
/// of definitions.
pub fn parse_definitions(json: &str) -> Result<Vec<RecordTypeDefinition>, SchemaError> {
    Ok(match serde_json::from_str::<DefinitionFile>(json)? {
        DefinitionFile::Many(definitions) => definitions,
        DefinitionFile::One(definition) => vec![definition],
    })
}

/// Parses and declares every record type in a JSON document, in order.
///
/// # Errors
/// Returns the first parse or declaration error. Types declared before the
/// failing one stay declared.
pub fn load_record_types_from_str(
    json: &str,
    registry: &SchemaRegistry,
) -> Result<Vec<Arc<RecordType>>, SchemaError> {
    let mut declared = Vec::new();
    for definition in parse_definitions(json)? {
        declared.push(registry.declare(RecordType::try_from(definition)?)?);
    }
    Ok(declared)
}

/// Reads a definition file and declares its record types.
///
/// # Errors
/// Returns `SchemaError::Io` if the file cannot be read, otherwise as
/// [`load_record_types_from_str`].
pub fn load_record_types_from_file<P: AsRef<Path>>(
    path: P,
    registry: &SchemaRegistry,
) -> Result<Vec<Arc<RecordType>>, SchemaError> {
    let path = path.as_ref();
    let declared = fs::read_to_string(path)
        .map_err(SchemaError::from)
        .and_then(|json| load_record_types_from_str(&json, registry))
        .map_err(|e| {
            log_schema_error!("Failed to load record types from {}: {}", path.display(), e);
            e
        })?;
    log_schema_info!(
        "Loaded {} record types from {}",
        declared.len(),
        path.display()
    );
    Ok(declared)
}
