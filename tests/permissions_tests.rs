use fieldperm::permissions::{
    derive_key, register_field_permissions, AccessError, AccessEvaluator, Action, Actor, GrantSet,
    UnknownFieldPolicy,
};
use fieldperm::schema::{FieldDescriptor, Permission, RecordType, SchemaRegistry};
use std::collections::HashSet;
use std::sync::Arc;

fn document(exclude: &[&str]) -> RecordType {
    RecordType::new("app", "document")
        .with_fields([
            FieldDescriptor::primary_key("id"),
            FieldDescriptor::new("title").with_label("Title"),
            FieldDescriptor::new("remarks").with_label("Remarks"),
        ])
        .with_exclusions(exclude.iter().copied())
}

#[test]
fn test_registration_without_exclusions() {
    let permissions = register_field_permissions(&document(&[])).unwrap();
    assert_eq!(
        permissions,
        vec![
            Permission::new("change_document_title_field", "Can change Title field"),
            Permission::new("view_document_title_field", "Can view Title field"),
            Permission::new("change_document_remarks_field", "Can change Remarks field"),
            Permission::new("view_document_remarks_field", "Can view Remarks field"),
        ]
    );
}

#[test]
fn test_registration_with_exclusion() {
    let permissions = register_field_permissions(&document(&["remarks"])).unwrap();
    assert_eq!(
        permissions,
        vec![
            Permission::new("change_document_title_field", "Can change Title field"),
            Permission::new("view_document_title_field", "Can view Title field"),
        ]
    );
}

#[test]
fn test_primary_key_never_registered() {
    for exclude in [&[][..], &["title"][..], &["title", "remarks"][..]] {
        let permissions = register_field_permissions(&document(exclude)).unwrap();
        assert!(permissions
            .iter()
            .all(|p| !p.codename.starts_with("change_document_id")
                && !p.codename.starts_with("view_document_id")));
    }
}

#[test]
fn test_registered_identifiers_are_unique() {
    let record = RecordType::new("app", "asset")
        .with_fields(["name", "owner", "status", "location", "price"].map(FieldDescriptor::new))
        .with_exclusions(Vec::<String>::new());
    let permissions = register_field_permissions(&record).unwrap();
    let unique: HashSet<&str> = permissions.iter().map(|p| p.codename.as_str()).collect();
    assert_eq!(unique.len(), permissions.len());
    assert_eq!(permissions.len(), 10);
}

#[test]
fn test_single_grant_scenario() {
    let doc = document(&[]);
    let actor = GrantSet::new().with_grant("app.change_document_title_field");
    let evaluator = AccessEvaluator::new();

    assert!(evaluator
        .has_access_to_field(&doc, "title", &actor, &Action::Change)
        .unwrap());
    assert!(!evaluator
        .has_access_to_field(&doc, "title", &actor, &Action::View)
        .unwrap());
    assert_eq!(
        evaluator.allowed_fields(&doc, &actor, &Action::Change).unwrap(),
        vec!["title".to_string()]
    );
}

#[test]
fn test_excluded_field_without_grants_is_denied() {
    let doc = document(&["remarks"]);
    let actor = GrantSet::new();
    assert!(!AccessEvaluator::new()
        .has_access_to_field(&doc, "remarks", &actor, &Action::Change)
        .unwrap());
}

#[test]
fn test_excluded_field_never_listed_even_when_granted() {
    let doc = document(&["remarks"]);
    let actor = GrantSet::new()
        .with_grant("app.change_document_remarks_field")
        .with_grant("app.change_document_title_field");
    let evaluator = AccessEvaluator::new();

    // The store still answers for the excluded field directly.
    assert!(evaluator
        .has_access_to_field(&doc, "remarks", &actor, &Action::Change)
        .unwrap());
    assert_eq!(
        evaluator.allowed_fields(&doc, &actor, &Action::Change).unwrap(),
        vec!["title".to_string()]
    );
}

#[test]
fn test_grants_are_scoped() {
    let doc = document(&[]);
    let actor = GrantSet::new().with_grant("other.change_document_title_field");
    assert!(!AccessEvaluator::new()
        .has_access_to_field(&doc, "title", &actor, &Action::Change)
        .unwrap());
}

#[test]
fn test_inactive_actor_has_no_access() {
    let doc = document(&[]);
    let actor = GrantSet::superuser().deactivate();
    assert!(AccessEvaluator::new()
        .allowed_fields(&doc, &actor, &Action::View)
        .unwrap()
        .is_empty());
}

#[test]
fn test_custom_action() {
    let doc = document(&[]);
    let approve = Action::Custom("approve".to_string());
    let key = derive_key(&approve, doc.type_name(), "title");
    let actor = GrantSet::new().with_grant(key.qualified(doc.scope()));
    assert_eq!(
        AccessEvaluator::new()
            .allowed_fields(&doc, &actor, &approve)
            .unwrap(),
        vec!["title".to_string()]
    );
}

#[test]
fn test_strict_policy_rejects_unknown_fields() {
    let doc = document(&[]);
    let evaluator = AccessEvaluator::with_unknown_field_policy(UnknownFieldPolicy::Strict);
    let actor = GrantSet::superuser();

    let err = evaluator
        .has_access_to_field(&doc, "nonexistent", &actor, &Action::View)
        .unwrap_err();
    match err {
        AccessError::UnknownField {
            type_name,
            field_name,
        } => {
            assert_eq!(type_name, "document");
            assert_eq!(field_name, "nonexistent");
        }
        AccessError::Store(never) => match never {},
    }

    // Excluded but existing fields are not unknown.
    let doc = document(&["remarks"]);
    assert!(evaluator
        .has_access_to_field(&doc, "remarks", &actor, &Action::View)
        .is_ok());
}

#[derive(Debug, thiserror::Error)]
#[error("identity store unreachable: {0}")]
struct StoreDown(String);

struct FlakyStore {
    fail_on: &'static str,
    grants: GrantSet,
}

impl Actor for FlakyStore {
    type Error = StoreDown;

    fn has_permission(&self, qualified: &str) -> Result<bool, Self::Error> {
        if qualified == self.fail_on {
            return Err(StoreDown(qualified.to_string()));
        }
        Ok(self.grants.has_permission(qualified).unwrap_or(false))
    }
}

#[test]
fn test_store_error_passes_through_unchanged() {
    let doc = document(&[]);
    let actor = FlakyStore {
        fail_on: "app.view_document_remarks_field",
        grants: GrantSet::new().with_grant("app.view_document_title_field"),
    };
    let evaluator = AccessEvaluator::new();

    assert!(evaluator
        .has_access_to_field(&doc, "title", &actor, &Action::View)
        .unwrap());
    match evaluator.allowed_fields(&doc, &actor, &Action::View) {
        Err(AccessError::Store(StoreDown(name))) => {
            assert_eq!(name, "app.view_document_remarks_field");
        }
        other => panic!("expected store error, got {other:?}"),
    }
}

#[test]
fn test_concurrent_queries_share_declared_type() {
    let registry = SchemaRegistry::new();
    let doc = registry.declare(document(&[])).unwrap();
    let evaluator = Arc::new(AccessEvaluator::new());
    let actor = Arc::new(
        GrantSet::new()
            .with_grant("app.view_document_title_field")
            .with_grant("app.view_document_remarks_field"),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let doc = Arc::clone(&doc);
            let evaluator = Arc::clone(&evaluator);
            let actor = Arc::clone(&actor);
            std::thread::spawn(move || {
                evaluator
                    .allowed_fields(&doc, actor.as_ref(), &Action::View)
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            vec!["title".to_string(), "remarks".to_string()]
        );
    }
}
