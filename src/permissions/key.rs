//! Permission identifiers.
//!
//! A field permission identifier has the form
//! `{action}_{type_name}_{field_name}_field`. Persisted grants refer to these
//! strings, so the format must not change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What an actor wants to do with a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    #[default]
    Change,
    View,
    /// Any other action tag. Parsed tags are lowercased.
    Custom(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Change => "change",
            Action::View => "view",
            Action::Custom(tag) => tag.as_str(),
        }
    }

    /// The actions every eligible field gets permissions for, in
    /// registration order.
    pub fn field_actions() -> [Action; 2] {
        [Action::Change, Action::View]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an action tag cannot be used in an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid action tag: '{0}'")]
pub struct InvalidAction(pub String);

impl FromStr for Action {
    type Err = InvalidAction;

    // Tags are lowercased so "View" and "view" name the same identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "change" => Ok(Action::Change),
            "view" => Ok(Action::View),
            "" => Err(InvalidAction(s.to_string())),
            tag if tag.contains('.') || tag.chars().any(char::is_whitespace) => {
                Err(InvalidAction(s.to_string()))
            }
            tag => Ok(Action::Custom(tag.to_string())),
        }
    }
}

impl TryFrom<String> for Action {
    type Error = InvalidAction;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.as_str().to_string()
    }
}

/// A permission identifier, unqualified by scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionKey(String);

impl PermissionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The name the identity store knows this permission by:
    /// `{scope}.{identifier}`.
    pub fn qualified(&self, scope: &str) -> String {
        format!("{}.{}", scope, self.0)
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PermissionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<PermissionKey> for String {
    fn from(key: PermissionKey) -> Self {
        key.0
    }
}

/// Builds the field permission identifier for an action on a field.
///
/// ```
/// use fieldperm::permissions::{derive_key, Action};
///
/// let key = derive_key(&Action::Change, "baseobject", "remarks");
/// assert_eq!(key.as_str(), "change_baseobject_remarks_field");
/// ```
pub fn derive_key(action: &Action, type_name: &str, field_name: &str) -> PermissionKey {
    PermissionKey(format!("{}_{}_{}_field", action, type_name, field_name))
}
