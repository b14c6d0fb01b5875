use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::permissions::actor::Actor;
use crate::permissions::key::{derive_key, Action};
use crate::schema::types::RecordType;
use crate::{log_permissions_debug, log_permissions_error, log_permissions_warn};

/// Anything that knows which record type it belongs to.
pub trait Record {
    fn record_type(&self) -> &RecordType;
}

impl Record for RecordType {
    fn record_type(&self) -> &RecordType {
        self
    }
}

impl Record for Arc<RecordType> {
    fn record_type(&self) -> &RecordType {
        self
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn record_type(&self) -> &RecordType {
        (**self).record_type()
    }
}

/// How a query for a field the record type does not have is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Derive the identifier anyway and let the identity store decide. No
    /// grant can reference it, so ordinary actors are denied.
    #[default]
    Permissive,
    /// Fail with `AccessError::UnknownField` before asking the store.
    Strict,
}

impl fmt::Display for UnknownFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownFieldPolicy::Permissive => f.write_str("permissive"),
            UnknownFieldPolicy::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for UnknownFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "permissive" => Ok(UnknownFieldPolicy::Permissive),
            "strict" => Ok(UnknownFieldPolicy::Strict),
            other => Err(format!("Invalid unknown field policy: {other}")),
        }
    }
}

/// Errors from an access query. Denial is never an error.
#[derive(Debug, thiserror::Error)]
pub enum AccessError<E>
where
    E: std::error::Error + 'static,
{
    #[error("Unknown field '{field_name}' on {type_name}")]
    UnknownField {
        type_name: String,
        field_name: String,
    },

    /// The identity store failed; the error is passed through untouched.
    #[error(transparent)]
    Store(E),
}

/// Outcome of checking one requested field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPermissionResult {
    pub field_name: String,
    pub allowed: bool,
}

/// Answers field-level access questions for record types.
///
/// The evaluator holds no state besides its policy. Each call derives the
/// identifier again and asks the actor, so it is safe to share across
/// threads as long as the actor is.
#[derive(Debug, Default, Clone)]
pub struct AccessEvaluator {
    unknown_fields: UnknownFieldPolicy,
}

impl AccessEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unknown_field_policy(unknown_fields: UnknownFieldPolicy) -> Self {
        Self { unknown_fields }
    }

    pub fn unknown_field_policy(&self) -> UnknownFieldPolicy {
        self.unknown_fields
    }

    /// Checks whether the actor may perform `action` on one field.
    ///
    /// Excluded fields can be queried; since no identifier was registered
    /// for them, only a superuser-style store will say yes.
    ///
    /// # Errors
    /// `AccessError::UnknownField` under the strict policy when the record
    /// type has no such field, and `AccessError::Store` when the actor's
    /// store fails.
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
        let record_type = record.record_type();
        if self.unknown_fields == UnknownFieldPolicy::Strict && !record_type.has_field(field_name) {
            log_permissions_warn!(
                "Rejected {} check for unknown field {}.{}",
                action,
                record_type.type_name(),
                field_name
            );
            return Err(AccessError::UnknownField {
                type_name: record_type.type_name().to_string(),
                field_name: field_name.to_string(),
            });
        }

        let qualified =
            derive_key(action, record_type.type_name(), field_name).qualified(record_type.scope());
        let allowed = actor.has_permission(&qualified).map_err(|e| {
            log_permissions_error!("Identity store failed on {}: {}", qualified, e);
            AccessError::Store(e)
        })?;
        log_permissions_debug!(
            "Permission {}: {}",
            qualified,
            if allowed { "granted" } else { "denied" }
        );
        Ok(allowed)
    }

    /// Lists the fields the actor may perform `action` on, in declaration
    /// order. Primary keys and excluded fields are never listed.
    ///
    /// # Errors
    /// Returns `AccessError::Store` as soon as the store fails for any field.
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
        let record_type = record.record_type();
        let mut result = Vec::new();
        for field in record_type.eligible_fields() {
            if self.has_access_to_field(record_type, &field.name, actor, action)? {
                result.push(field.name.clone());
            }
        }
        Ok(result)
    }

    /// Checks a list of requested fields one by one, keeping the request
    /// order. Unknown fields are reported as denied unless the policy is
    /// strict, in which case the first one fails the whole check.
    ///
    /// # Errors
    /// Same as [`AccessEvaluator::has_access_to_field`].
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
        let mut results = Vec::with_capacity(field_names.len());
        for field_name in field_names {
            let field_name = field_name.as_ref();
            let allowed = self.has_access_to_field(record, field_name, actor, action)?;
            results.push(FieldPermissionResult {
                field_name: field_name.to_string(),
                allowed,
            });
        }
        Ok(results)
    }
}
