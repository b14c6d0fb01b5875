use fieldperm::schema::{
    load_record_types_from_file, load_record_types_from_str, FieldDescriptor, RecordType,
    SchemaError, SchemaRegistry,
};
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

fn document() -> RecordType {
    RecordType::new("app", "Document").with_fields([
        FieldDescriptor::primary_key("id"),
        FieldDescriptor::new("title").with_label("Title"),
        FieldDescriptor::new("remarks").with_label("Remarks"),
    ])
}

fn codenames(record_type: &RecordType) -> Vec<String> {
    record_type
        .permissions()
        .iter()
        .map(|p| p.codename.clone())
        .collect()
}

#[test]
fn test_declare_registers_once() {
    let registry = SchemaRegistry::new();
    let declared = registry.declare(document().with_exclusions(Vec::<String>::new())).unwrap();
    let expected = vec![
        "change_document_title_field",
        "view_document_title_field",
        "change_document_remarks_field",
        "view_document_remarks_field",
    ];
    assert_eq!(codenames(&declared), expected);

    // Declaring and refreshing again leaves the registry as it was.
    registry.declare(document().with_exclusions(Vec::<String>::new())).unwrap();
    assert_eq!(registry.refresh_field_permissions("app", "document").unwrap(), 0);
    assert_eq!(codenames(&registry.require("app", "document").unwrap()), expected);
    assert_eq!(registry.all_permissions().unwrap().len(), 4);
}

#[test]
fn test_exclusions_are_honored_in_registry() {
    let registry = SchemaRegistry::new();
    let declared = registry.declare(document().with_exclusions(["remarks"])).unwrap();
    assert!(codenames(&declared).iter().all(|c| !c.contains("remarks")));
}

#[test]
fn test_missing_exclusion_set_fails_at_declaration() {
    let registry = SchemaRegistry::new();
    match registry.declare(document()) {
        Err(SchemaError::Configuration { type_name, .. }) => assert_eq!(type_name, "document"),
        other => panic!("expected configuration error, got {other:?}"),
    }
    assert!(!registry.contains("app", "document").unwrap());
}

#[test]
fn test_concurrent_declaration_is_idempotent() {
    let registry = Arc::new(SchemaRegistry::new());
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                registry
                    .declare(document().with_exclusions(["remarks"]))
                    .unwrap()
            })
        })
        .collect();

    let declared: Vec<Arc<RecordType>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(declared.iter().all(|d| Arc::ptr_eq(d, &declared[0])));
    assert_eq!(registry.len().unwrap(), 1);
    assert_eq!(
        codenames(&declared[0]),
        vec!["change_document_title_field", "view_document_title_field"]
    );
}

#[test]
fn test_types_are_keyed_by_scope() {
    let registry = SchemaRegistry::new();
    registry.declare(document().with_exclusions(["remarks"])).unwrap();
    let other = RecordType::new("archive", "document")
        .with_field(FieldDescriptor::new("title"))
        .with_exclusions(Vec::<String>::new());
    registry.declare(other).unwrap();

    assert_eq!(
        registry.list().unwrap(),
        vec!["app.document".to_string(), "archive.document".to_string()]
    );
    let scopes: Vec<String> = registry
        .all_permissions()
        .unwrap()
        .into_iter()
        .map(|(scope, _)| scope)
        .collect();
    assert_eq!(scopes, vec!["app", "app", "archive", "archive"]);
}

#[test]
fn test_load_definitions_file_with_several_types() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("types.json");
    fs::write(
        &path,
        r#"[
            {
                "scope": "assets",
                "name": "BaseObject",
                "fields": [
                    {"name": "id", "primary_key": true},
                    {"name": "service_env"},
                    {"name": "remarks", "label": "Remarks"}
                ],
                "permissions": {"exclude": []}
            },
            {
                "scope": "assets",
                "name": "Licence",
                "fields": [
                    {"name": "id", "primary_key": true},
                    {"name": "niw", "label": "Inventory number"}
                ],
                "permissions": {"exclude": ["niw"]}
            }
        ]"#,
    )?;

    let registry = SchemaRegistry::new();
    let declared = load_record_types_from_file(&path, &registry)?;
    assert_eq!(declared.len(), 2);

    let base = registry.require("assets", "baseobject")?;
    assert_eq!(base.permissions()[0].codename, "change_baseobject_service_env_field");
    assert_eq!(base.permissions()[0].description, "Can change service env field");
    assert_eq!(base.permissions().len(), 4);

    let licence = registry.require("assets", "licence")?;
    assert!(licence.permissions().is_empty());
    Ok(())
}

#[test]
fn test_failed_load_keeps_earlier_types() {
    let registry = SchemaRegistry::new();
    let json = r#"[
        {"scope": "app", "name": "good", "fields": [{"name": "a"}], "permissions": {}},
        {"scope": "app", "name": "bad", "fields": [{"name": "a"}]}
    ]"#;
    let err = load_record_types_from_str(json, &registry).unwrap_err();
    assert!(err.is_configuration());
    assert!(registry.contains("app", "good").unwrap());
    assert!(!registry.contains("app", "bad").unwrap());
}
