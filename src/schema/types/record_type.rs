use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

use super::errors::SchemaError;
use super::fields::FieldDescriptor;
use super::permission::{FieldPermissionConfig, Permission};

/// One kind of record: its scope, name, ordered fields, field permission
/// settings and the permissions registered for it.
///
/// The type name is stored lowercased since it becomes part of every
/// permission identifier. The permission list only ever grows, and never
/// holds the same codename twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordType {
    scope: String,
    type_name: String,
    fields: Vec<FieldDescriptor>,
    field_permissions: Option<FieldPermissionConfig>,
    permissions: Vec<Permission>,
}

impl RecordType {
    #[must_use]
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            type_name: name.into().to_lowercase(),
            fields: Vec::new(),
            field_permissions: None,
            permissions: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_fields<I: IntoIterator<Item = FieldDescriptor>>(mut self, fields: I) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Sets the field permission configuration. An empty iterator is an
    /// explicit "exclude nothing", which is different from never calling this.
    pub fn with_exclusions<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_permissions = Some(FieldPermissionConfig::new(exclude));
        self
    }

    pub fn with_field_permissions(mut self, config: Option<FieldPermissionConfig>) -> Self {
        self.field_permissions = config;
        self
    }

    /// Adds an author-declared permission that precedes generated ones.
    pub fn with_permission(
        mut self,
        codename: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.append_permissions([Permission::new(codename, description)]);
        self
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn field_permissions(&self) -> Option<&FieldPermissionConfig> {
        self.field_permissions.as_ref()
    }

    /// The exclusion set.
    ///
    /// # Errors
    /// Returns `SchemaError::Configuration` when the type was declared without
    /// field permission settings.
    pub fn exclusion_set(&self) -> Result<&BTreeSet<String>, SchemaError> {
        self.field_permissions
            .as_ref()
            .map(|config| &config.exclude)
            .ok_or_else(|| {
                SchemaError::configuration(
                    &self.type_name,
                    "missing field permission settings (exclusion set)",
                )
            })
    }

    pub fn is_excluded(&self, field_name: &str) -> bool {
        self.field_permissions
            .as_ref()
            .is_some_and(|config| config.is_excluded(field_name))
    }

    /// Whether field permissions exist for this field: not the primary key and
    /// not excluded.
    pub fn is_field_eligible(&self, field: &FieldDescriptor) -> bool {
        !field.is_primary_key() && !self.is_excluded(&field.name)
    }

    /// Fields that carry field permissions, in declaration order.
    pub fn eligible_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields
            .iter()
            .filter(move |field| self.is_field_eligible(field))
    }

    /// Registered permissions, author-declared ones first.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    pub fn has_permission_codename(&self, codename: &str) -> bool {
        self.permissions.iter().any(|p| p.codename == codename)
    }

    /// Appends permissions, skipping codenames already registered. Returns the
    /// number actually appended.
    pub fn append_permissions<I: IntoIterator<Item = Permission>>(&mut self, permissions: I) -> usize {
        let mut appended = 0;
        for permission in permissions {
            if self.has_permission_codename(&permission.codename) {
                continue;
            }
            self.permissions.push(permission);
            appended += 1;
        }
        appended
    }

    /// Checks the descriptor is complete enough to be declared.
    ///
    /// # Errors
    /// Returns `SchemaError::Configuration` for a missing exclusion set, an
    /// empty field list, malformed names or duplicate fields.
    pub fn validate(&self) -> Result<(), SchemaError> {
        check_identifier(&self.type_name, "scope", &self.scope)?;
        check_identifier(&self.type_name, "type name", &self.type_name)?;
        self.exclusion_set()?;
        if self.fields.is_empty() {
            return Err(SchemaError::configuration(&self.type_name, "empty field list"));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            check_identifier(&self.type_name, "field name", &field.name)?;
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::configuration(
                    &self.type_name,
                    format!("duplicate field '{}'", field.name),
                ));
            }
        }
        Ok(())
    }

    /// Excluded names that do not match any field.
    pub fn unknown_exclusions(&self) -> Vec<&str> {
        self.field_permissions
            .iter()
            .flat_map(|config| config.exclude.iter())
            .filter(|name| !self.has_field(name))
            .map(String::as_str)
            .collect()
    }
}

// Dots separate scope from identifier in qualified names.
fn check_identifier(type_name: &str, what: &str, value: &str) -> Result<(), SchemaError> {
    if value.is_empty() {
        return Err(SchemaError::configuration(type_name, format!("empty {what}")));
    }
    if value.contains('.') || value.chars().any(char::is_whitespace) {
        return Err(SchemaError::configuration(
            type_name,
            format!("{what} '{value}' must not contain dots or whitespace"),
        ));
    }
    Ok(())
}
