use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A registered permission: the identifier grants are stored under, plus the
/// description shown to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub codename: String,
    pub description: String,
}

impl Permission {
    pub fn new(codename: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            codename: codename.into(),
            description: description.into(),
        }
    }
}

/// Field permission settings of a record type.
///
/// Fields listed in `exclude` never get field permissions generated. The set
/// is fixed once the type is declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPermissionConfig {
    #[serde(default)]
    pub exclude: BTreeSet<String>,
}

impl FieldPermissionConfig {
    pub fn new<I, S>(exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_excluded(&self, field_name: &str) -> bool {
        self.exclude.contains(field_name)
    }
}
