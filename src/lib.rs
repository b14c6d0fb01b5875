//! # fieldperm
//!
//! Field-level access control for record types. Instead of gating a whole
//! record, every field gets its own permissions, derived automatically from
//! the record type's field list.
//!
//! ## Core Components
//!
//! * `permissions` - Identifier derivation, field permission registration and
//!   access evaluation against an actor
//! * `schema` - Record type descriptors, the registry that declares them and a
//!   JSON definition loader
//! * `config` - TOML configuration with environment overrides
//! * `logging` - `log` targets per feature and logger setup
//! * `engine` - A facade wiring the pieces together
//!
//! ## Identifiers
//!
//! For each field that is neither the primary key nor excluded, two
//! permissions are registered when the type is declared:
//! `change_{type}_{field}_field` and `view_{type}_{field}_field`. Access checks
//! ask the actor for `{scope}.{identifier}`.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod permissions;
pub mod schema;

pub use config::{ConfigError, FieldPermConfig};
pub use engine::FieldAccessEngine;
pub use error::{FieldPermError, FieldPermResult};
pub use permissions::{
    derive_key, register_field_permissions, AccessError, AccessEvaluator, Action, Actor, GrantSet,
    PermissionKey, Record, UnknownFieldPolicy,
};
pub use schema::{FieldDescriptor, Permission, RecordType, SchemaError, SchemaRegistry};
