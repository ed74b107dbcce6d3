//! End-to-end workflow tests through the public crate API.
//!
//! These drive the same code the HTTP handlers call, against the in-memory
//! store, so no database is required. Unit-level edge cases live next to the
//! modules they test; this file covers whole-lifecycle behavior.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use directory_core::domains::member::{MemberError, MemberWorkflow};
use directory_core::kernel::{
    FieldMap, InMemoryMemberStore, MemberStore, CREATED_AT_FIELD,
};

fn setup() -> (Arc<InMemoryMemberStore>, MemberWorkflow) {
    let store = Arc::new(InMemoryMemberStore::new());
    let workflow = MemberWorkflow::new(store.clone());
    (store, workflow)
}

/// Register → refused immediate removal → removal after the gate → gone.
#[tokio::test]
async fn test_full_member_lifecycle() {
    let (store, workflow) = setup();

    let registered = workflow
        .register(Some("Jimin"), Some("jimin@example.com"))
        .await
        .unwrap();

    let found = workflow.find_by_name(Some("Jimin")).await.unwrap();
    assert_eq!(found.id, registered.id);

    assert!(matches!(
        workflow.remove_by_name(Some("Jimin")).await.unwrap_err(),
        MemberError::TooSoon
    ));

    // Simulate 61 seconds passing by backdating the registration timestamp
    let mut patch = FieldMap::new();
    patch.insert(
        CREATED_AT_FIELD.to_string(),
        serde_json::to_value(Utc::now() - Duration::seconds(61)).unwrap(),
    );
    store.update_by_id(registered.id, &patch).await.unwrap();

    workflow.remove_by_name(Some("Jimin")).await.unwrap();

    assert!(matches!(
        workflow.find_by_name(Some("Jimin")).await.unwrap_err(),
        MemberError::NotFound
    ));
    assert!(store.is_empty().await);
}

/// Duplicate names are tolerated; lookups act on the store's first match and
/// removal of that match exposes the second one.
#[tokio::test]
async fn test_duplicate_names_first_match_wins() {
    let (store, workflow) = setup();

    let first = workflow
        .register(Some("Jimin"), Some("first@example.com"))
        .await
        .unwrap();
    let second = workflow
        .register(Some("Jimin"), Some("second@example.com"))
        .await
        .unwrap();
    assert_ne!(first.id, second.id);

    let found = workflow.find_by_name(Some("Jimin")).await.unwrap();
    assert_eq!(found.id, first.id);

    let mut patch = FieldMap::new();
    patch.insert(
        CREATED_AT_FIELD.to_string(),
        serde_json::to_value(Utc::now() - Duration::seconds(120)).unwrap(),
    );
    store.update_by_id(first.id, &patch).await.unwrap();
    workflow.remove_by_name(Some("Jimin")).await.unwrap();

    let found = workflow.find_by_name(Some("Jimin")).await.unwrap();
    assert_eq!(found.id, second.id);
}

/// A merge-patch update shows up in subsequent lookups, extra fields and all.
#[tokio::test]
async fn test_update_is_visible_to_lookup() {
    let (_, workflow) = setup();

    workflow
        .register(Some("Jimin"), Some("jimin@example.com"))
        .await
        .unwrap();

    let mut updates = FieldMap::new();
    updates.insert("email".to_string(), json!("new@example.com"));
    updates.insert("nickname".to_string(), json!("jm"));
    workflow
        .update_by_name(Some("Jimin"), Some(updates))
        .await
        .unwrap();

    let found = workflow.find_by_name(Some("Jimin")).await.unwrap();
    assert_eq!(found.fields["email"], json!("new@example.com"));
    assert_eq!(found.fields["nickname"], json!("jm"));
    assert_eq!(found.fields["name"], json!("Jimin"));
}
