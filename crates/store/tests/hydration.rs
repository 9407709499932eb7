//! Hydration and write-back against the document-store boundary.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use serde_json::json;
use threew_core::plan::{CreatePlan, Priority, ReminderSettings, Status, WhatSpec, WhenSpec, WhoSpec};
use threew_core::team::TeamMember;
use threew_store::{InMemoryDocumentStore, PersistenceError, PlanStore, RecordingChannel};

fn store() -> PlanStore {
    PlanStore::new(Arc::new(RecordingChannel::new()))
}

fn draft(title: &str) -> CreatePlan {
    CreatePlan {
        title: title.into(),
        what: WhatSpec::default(),
        who: WhoSpec {
            primary_assignee: TeamMember::new("m1", "Ada", "ada@example.com"),
            supporting_members: vec![],
            stakeholders: vec![],
        },
        when: WhenSpec {
            due_date: Utc::now() + Duration::days(2),
            time_estimate_hours: 6.0,
            reminder: ReminderSettings::default(),
        },
        priority: Priority::Low,
        status: Status::Pending,
        tags: vec![],
        dependencies: vec![],
        checklist: vec![],
    }
}

fn who_doc() -> serde_json::Value {
    json!({
        "primary_assignee": {
            "id": "m1", "name": "Ada", "email": "ada@example.com",
            "availability": "available"
        }
    })
}

#[tokio::test]
async fn hydrate_replaces_the_working_set() {
    let docs = InMemoryDocumentStore::new();
    docs.seed([
        (
            "p1".to_string(),
            json!({ "id": "p1", "title": "Stored one", "who": who_doc(), "status": "blocked" }),
        ),
        (
            "p2".to_string(),
            json!({ "id": "p2", "title": "Stored two", "who": who_doc() }),
        ),
    ])
    .await;

    let mut store = store();
    store.add(draft("Local only"), "m1");

    let loaded = store.hydrate(&docs).await.unwrap();
    assert_eq!(loaded, 2);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("p1").unwrap().status, Status::Blocked);
    assert_eq!(store.get("p2").unwrap().status, Status::Pending);
}

#[tokio::test]
async fn hydrate_failure_leaves_prior_state_untouched() {
    let docs = InMemoryDocumentStore::new();
    docs.seed([(
        "p1".to_string(),
        json!({ "id": "p1", "title": "Stored", "who": who_doc() }),
    )])
    .await;
    docs.set_unavailable(true);

    let mut store = store();
    let local_id = store.add(draft("Survivor"), "m1").id.clone();

    let err = store.hydrate(&docs).await.unwrap_err();
    assert_matches!(err, PersistenceError::Unavailable(_));
    assert_eq!(store.len(), 1);
    assert!(store.get(&local_id).is_some());
}

#[tokio::test]
async fn hydrate_skips_undecodable_documents() {
    let docs = InMemoryDocumentStore::new();
    docs.seed([
        (
            "good".to_string(),
            json!({ "id": "good", "title": "Fine", "who": who_doc() }),
        ),
        ("bad".to_string(), json!({ "title": "No id" })),
        ("worse".to_string(), json!([1, 2, 3])),
    ])
    .await;

    let mut store = store();
    let loaded = store.hydrate(&docs).await.unwrap();
    assert_eq!(loaded, 1);
    assert!(store.get("good").is_some());
}

#[tokio::test]
async fn hydrate_prunes_side_collections_of_dropped_plans() {
    let docs = InMemoryDocumentStore::new();
    docs.seed([(
        "p1".to_string(),
        json!({ "id": "p1", "title": "Stored", "who": who_doc() }),
    )])
    .await;

    let mut store = store();
    let local_id = store.add(draft("Local"), "m1").id.clone();
    let author = TeamMember::new("m1", "Ada", "ada@example.com");
    store.add_comment(&local_id, author, "note", vec![]).unwrap();
    store
        .add_attachment(&local_id, "draft.pdf", "https://files/draft.pdf", 256, "m1")
        .unwrap();
    store
        .request_approval(&local_id, "m1", vec!["m2".into()], None)
        .unwrap();

    store.hydrate(&docs).await.unwrap();

    // The local plan was dropped by the load; nothing keyed by its id may
    // survive it.
    assert!(store.get(&local_id).is_none());
    assert!(store.comments(&local_id).is_empty());
    assert!(store.attachments(&local_id).is_empty());
    assert!(store.activity(&local_id).is_empty());
    assert!(store.approval(&local_id).is_none());
}

#[tokio::test]
async fn hydrate_keeps_side_collections_of_surviving_plans() {
    let docs = InMemoryDocumentStore::new();
    let mut store = store();
    let id = store.add(draft("Kept"), "m1").id.clone();
    let author = TeamMember::new("m1", "Ada", "ada@example.com");
    store.add_comment(&id, author, "still here", vec![]).unwrap();
    store.persist(&docs, &id).await.unwrap();

    store.hydrate(&docs).await.unwrap();

    assert!(store.get(&id).is_some());
    assert_eq!(store.comments(&id).len(), 1);
}

#[tokio::test]
async fn hydrate_coerces_bad_timestamps_instead_of_failing() {
    let docs = InMemoryDocumentStore::new();
    let before = Utc::now();
    docs.seed([(
        "p1".to_string(),
        json!({
            "id": "p1",
            "title": "Odd clock",
            "who": who_doc(),
            "created_at": { "seconds": 1700000000 },
            "updated_at": "not a date"
        }),
    )])
    .await;

    let mut store = store();
    store.hydrate(&docs).await.unwrap();
    let plan = store.get("p1").unwrap();
    assert!(plan.created_at >= before);
    assert!(plan.updated_at >= before);
}

#[tokio::test]
async fn persist_creates_then_updates() {
    let docs = InMemoryDocumentStore::new();
    let mut store = store();
    let id = store.add(draft("Persisted"), "m1").id.clone();

    // First write-back lands as a create.
    store.persist(&docs, &id).await.unwrap();
    assert_eq!(docs.len().await, 1);

    // After a local change, write-back overwrites in place.
    let patch = threew_core::plan::UpdatePlan {
        title: Some("Persisted twice".into()),
        ..threew_core::plan::UpdatePlan::default()
    };
    store.update(&id, patch, "m1").unwrap();
    store.persist(&docs, &id).await.unwrap();
    assert_eq!(docs.len().await, 1);
    let doc = docs.get(&id).await.unwrap();
    assert_eq!(doc["title"], "Persisted twice");
}

#[tokio::test]
async fn persist_of_unknown_id_is_a_noop() {
    let docs = InMemoryDocumentStore::new();
    let store = store();
    store.persist(&docs, "ghost").await.unwrap();
    assert!(docs.is_empty().await);
}

#[tokio::test]
async fn persist_all_round_trips_through_hydrate() {
    let docs = InMemoryDocumentStore::new();
    let mut store = store();
    let a = store.add(draft("First"), "m1").id.clone();
    store.add(draft("Second"), "m1");

    let written = store.persist_all(&docs).await.unwrap();
    assert_eq!(written, 2);

    let mut fresh = PlanStore::new(Arc::new(RecordingChannel::new()));
    assert_eq!(fresh.hydrate(&docs).await.unwrap(), 2);
    assert_eq!(fresh.get(&a).unwrap().title, "First");
}

#[tokio::test]
async fn persist_failure_does_not_roll_back_local_state() {
    let docs = InMemoryDocumentStore::new();
    let mut store = store();
    let id = store.add(draft("Unsynced"), "m1").id.clone();
    docs.set_unavailable(true);

    let err = store.persist(&docs, &id).await.unwrap_err();
    assert_matches!(err, PersistenceError::Unavailable(_));
    assert!(store.get(&id).is_some());
}
