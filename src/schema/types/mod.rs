pub mod errors;
pub mod fields;
pub mod permission;
pub mod record_type;

pub use errors::SchemaError;
pub use fields::FieldDescriptor;
pub use permission::{FieldPermissionConfig, Permission};
pub use record_type::RecordType;
