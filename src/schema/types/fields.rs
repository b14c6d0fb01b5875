use serde::{Deserialize, Serialize};

/// One attribute of a record type, as supplied by the schema definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    // Human readable, used in permission descriptions
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub primary_key: bool,
}

impl FieldDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            primary_key: false,
        }
    }

    /// Creates the primary key field of a record type.
    #[must_use]
    pub fn primary_key(name: impl Into<String>) -> Self {
        Self {
            primary_key: true,
            ..Self::new(name)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label used in descriptions. Falls back to the field name with
    /// underscores turned into spaces.
    pub fn label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.name.replace('_', " "),
        }
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}
