//! Approval workflow and notification fan-out against a live `PlanStore`.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use threew_core::approval::ApprovalStatus;
use threew_core::error::CoreError;
use threew_core::notification::NotificationKind;
use threew_core::plan::{CreatePlan, Priority, ReminderSettings, Status, WhatSpec, WhenSpec, WhoSpec};
use threew_core::team::TeamMember;
use threew_store::{PlanStore, RecordingChannel};

fn store_with_channel() -> (PlanStore, Arc<RecordingChannel>) {
    let channel = Arc::new(RecordingChannel::new());
    (PlanStore::new(channel.clone()), channel)
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
            due_date: Utc::now() + Duration::days(3),
            time_estimate_hours: 4.0,
            reminder: ReminderSettings::default(),
        },
        priority: Priority::Medium,
        status: Status::Pending,
        tags: vec![],
        dependencies: vec![],
        checklist: vec![],
    }
}

#[test]
fn request_notifies_every_approver() {
    let (mut store, channel) = store_with_channel();
    let id = store.add(draft("Needs sign-off"), "m1").id.clone();

    store
        .request_approval(&id, "m1", vec!["m2".into(), "m3".into()], None)
        .unwrap();

    let sent = channel.sent();
    let approval_requests: Vec<_> = sent
        .iter()
        .filter(|n| matches!(n.kind, NotificationKind::ApprovalRequested { .. }))
        .collect();
    assert_eq!(approval_requests.len(), 2);
    assert_eq!(store.unread_count("m2"), 1);
    assert_eq!(store.unread_count("m3"), 1);
}

#[test]
fn request_on_missing_plan_is_not_found() {
    let (mut store, _) = store_with_channel();
    let err = store
        .request_approval("ghost", "m1", vec!["m2".into()], None)
        .unwrap_err();
    assert_matches!(err, CoreError::NotFound { .. });
}

#[test]
fn pending_approval_blocks_a_second_request() {
    let (mut store, _) = store_with_channel();
    let id = store.add(draft("Contested"), "m1").id.clone();
    store.request_approval(&id, "m1", vec!["m2".into()], None).unwrap();

    let err = store
        .request_approval(&id, "m1", vec!["m3".into()], None)
        .unwrap_err();
    assert_matches!(err, CoreError::Conflict(_));
}

#[test]
fn resolved_approval_can_be_requested_again() {
    let (mut store, _) = store_with_channel();
    let id = store.add(draft("Round two"), "m1").id.clone();
    store.request_approval(&id, "m1", vec!["m2".into()], None).unwrap();
    store
        .respond_approval(&id, ApprovalStatus::Rejected, "m2", None)
        .unwrap();

    store.request_approval(&id, "m1", vec!["m2".into()], None).unwrap();
    assert_eq!(store.approval(&id).unwrap().status, ApprovalStatus::Pending);
}

#[test]
fn first_resolution_wins_second_is_conflict() {
    let (mut store, _) = store_with_channel();
    let id = store.add(draft("Raced"), "m1").id.clone();
    store
        .request_approval(&id, "m1", vec!["m2".into(), "m3".into()], None)
        .unwrap();

    store
        .respond_approval(&id, ApprovalStatus::Approved, "m2", None)
        .unwrap();
    let err = store
        .respond_approval(&id, ApprovalStatus::Rejected, "m3", None)
        .unwrap_err();
    assert_matches!(err, CoreError::Conflict(_));

    let workflow = store.approval(&id).unwrap();
    assert_eq!(workflow.status, ApprovalStatus::Approved);
    assert_eq!(workflow.resolved_by.as_deref(), Some("m2"));
}

#[test]
fn resolution_notifies_the_requester() {
    let (mut store, channel) = store_with_channel();
    let id = store.add(draft("Closed out"), "m1").id.clone();
    store.request_approval(&id, "m1", vec!["m2".into()], None).unwrap();
    store
        .respond_approval(&id, ApprovalStatus::Approved, "m2", None)
        .unwrap();

    let resolved: Vec<_> = channel
        .sent()
        .into_iter()
        .filter(|n| matches!(n.kind, NotificationKind::ApprovalResolved { .. }))
        .collect();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].recipient, "m1");
    assert_matches!(
        &resolved[0].kind,
        NotificationKind::ApprovalResolved {
            resolution: ApprovalStatus::Approved,
            ..
        }
    );
}

#[test]
fn responding_without_a_request_is_not_found() {
    let (mut store, _) = store_with_channel();
    let id = store.add(draft("Unrequested"), "m1").id.clone();
    let err = store
        .respond_approval(&id, ApprovalStatus::Approved, "m2", None)
        .unwrap_err();
    assert_matches!(err, CoreError::NotFound { .. });
}

#[test]
fn mention_notifications_reach_mentioned_members_only() {
    let (mut store, channel) = store_with_channel();
    let id = store.add(draft("Discussed"), "m1").id.clone();
    let author = TeamMember::new("m1", "Ada", "ada@example.com");
    store
        .add_comment(&id, author, "what do you think?", vec!["m2".into()])
        .unwrap();

    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "m2");
    assert_matches!(sent[0].kind, NotificationKind::Mention { .. });
    assert_eq!(store.unread_count("m1"), 0);
}
