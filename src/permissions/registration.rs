use crate::permissions::key::{derive_key, Action};
use crate::schema::types::{Permission, RecordType, SchemaError};

/// Produces the field permissions of a record type.
///
/// Every field that is neither the primary key nor excluded yields two
/// entries, change then view, in field declaration order. The record type is
/// not modified; appending the result is up to the caller.
///
/// # Errors
/// Returns `SchemaError::Configuration` if the record type has no exclusion
/// set.
pub fn register_field_permissions(record_type: &RecordType) -> Result<Vec<Permission>, SchemaError> {
    let exclusions = record_type.exclusion_set()?;
    let type_name = record_type.type_name();

    let mut permissions = Vec::new();
    for field in record_type.fields() {
        if field.is_primary_key() || exclusions.contains(&field.name) {
            continue;
        }
        let label = field.label();
        for action in Action::field_actions() {
            permissions.push(Permission::new(
                derive_key(&action, type_name, &field.name).into_string(),
                format!("Can {} {} field", action, label),
            ));
        }
    }
    Ok(permissions)
}
