// permissions module

pub mod actor;
pub mod evaluator;
pub mod key;
pub mod registration;

pub use actor::{Actor, GrantSet};
pub use evaluator::{AccessError, AccessEvaluator, FieldPermissionResult, Record, UnknownFieldPolicy};
pub use key::{derive_key, Action, InvalidAction, PermissionKey};
pub use registration::register_field_permissions;
