use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::convert::Infallible;

/// The identity store's view of a user or principal.
///
/// `qualified` is a scope-qualified permission name such as
/// `app.change_document_title_field`. Errors from the backing store are
/// returned as-is; callers decide whether to retry.
pub trait Actor {
    type Error: std::error::Error + Send + Sync + 'static;

    fn has_permission(&self, qualified: &str) -> Result<bool, Self::Error>;
}

impl<A: Actor + ?Sized> Actor for &A {
    type Error = A::Error;

    fn has_permission(&self, qualified: &str) -> Result<bool, Self::Error> {
        (**self).has_permission(qualified)
    }
}

/// An in-memory actor holding an explicit set of grants.
///
/// An inactive actor holds no permissions at all. An active superuser holds
/// every permission, including ones never registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSet {
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub superuser: bool,
    #[serde(default)]
    pub grants: BTreeSet<String>,
}

fn default_active() -> bool {
    true
}

impl Default for GrantSet {
    fn default() -> Self {
        Self {
            active: true,
            superuser: false,
            grants: BTreeSet::new(),
        }
    }
}

impl GrantSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn superuser() -> Self {
        Self {
            superuser: true,
            ..Self::default()
        }
    }

    pub fn with_grant(mut self, qualified: impl Into<String>) -> Self {
        self.grant(qualified);
        self
    }

    pub fn grant(&mut self, qualified: impl Into<String>) {
        self.grants.insert(qualified.into());
    }

    pub fn revoke(&mut self, qualified: &str) -> bool {
        self.grants.remove(qualified)
    }

    pub fn deactivate(mut self) -> Self {
        self.active = false;
        self
    }
}

impl Actor for GrantSet {
    type Error = Infallible;

    fn has_permission(&self, qualified: &str) -> Result<bool, Self::Error> {
        if !self.active {
            return Ok(false);
        }
        if self.superuser {
            return Ok(true);
        }
        Ok(self.grants.contains(qualified))
    }
}
