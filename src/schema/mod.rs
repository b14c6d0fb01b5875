pub mod loader;
pub mod registry;
pub mod types;

pub use loader::{load_record_types_from_file, load_record_types_from_str, RecordTypeDefinition};
pub use registry::SchemaRegistry;

// Re-export all types at the schema module level
pub use types::{FieldDescriptor, FieldPermissionConfig, Permission, RecordType, SchemaError};
