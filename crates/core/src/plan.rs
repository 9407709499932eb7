//! The action plan record and its status lifecycle.
//!
//! An action plan is the core task entity, structured around the 3W
//! convention: What (description, success criteria, resources), Who
//! (primary assignee plus supporting members and stakeholders), and When
//! (due date, time estimate, reminder). The status graph is deliberately
//! flat: any state may move directly to any other. The one enforced rule
//! is that every transition is appended to `status_history` and `status`
//! always equals the `to` of the last entry.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::team::TeamMember;
use crate::types::{coerce_timestamp, RecordId, Timestamp};

/// Title suffix applied when a plan is duplicated.
pub const COPY_SUFFIX: &str = " (Copy)";

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Plan priority, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Severity rank; higher means more severe. Used for sorting.
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 3,
            Self::High => 2,
            Self::Medium => 1,
            Self::Low => 0,
        }
    }

    /// Contribution of priority to the bottleneck risk score (0-100 scale).
    pub fn risk_weight(self) -> f64 {
        match self {
            Self::Critical => 40.0,
            Self::High => 32.0,
            Self::Medium => 24.0,
            Self::Low => 16.0,
        }
    }
}

/// Lifecycle status of a plan.
///
/// `completed` is terminal in practice (the surrounding UI never leaves
/// it) but the data layer does not forbid leaving it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Blocked,
    Completed,
}

impl Status {
    /// Wire/display name, matching the serde rename.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Completed => "completed",
        }
    }

    /// Contribution of the current status to the bottleneck risk score.
    ///
    /// `blocked` must outrank `in_progress` at equal age and priority.
    pub fn risk_weight(self) -> f64 {
        match self {
            Self::Blocked => 20.0,
            Self::InProgress => 12.0,
            Self::Pending => 8.0,
            Self::Completed => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-records
// ---------------------------------------------------------------------------

/// One entry in the append-only status history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub from: Status,
    pub to: Status,
    pub changed_at: Timestamp,
    pub changed_by: RecordId,
}

/// The What of the 3W convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhatSpec {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub success_criteria: Vec<String>,
    #[serde(default)]
    pub required_resources: Vec<String>,
}

/// The Who of the 3W convention. Exactly one primary assignee; the other
/// lists may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhoSpec {
    pub primary_assignee: TeamMember,
    #[serde(default)]
    pub supporting_members: Vec<TeamMember>,
    #[serde(default)]
    pub stakeholders: Vec<TeamMember>,
}

/// Reminder configuration for a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReminderSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub reminder_date: Option<Timestamp>,
}

/// The When of the 3W convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenSpec {
    pub due_date: Timestamp,
    pub time_estimate_hours: f64,
    #[serde(default)]
    pub reminder: ReminderSettings,
}

/// One checklist item owned by a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: RecordId,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

// ---------------------------------------------------------------------------
// ActionPlan
// ---------------------------------------------------------------------------

/// The core task entity.
///
/// Invariants maintained by this type:
/// - `status_history` holds at least one entry at all times;
/// - `status` equals the `to` of the last history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub id: RecordId,
    pub title: String,
    pub what: WhatSpec,
    pub who: WhoSpec,
    pub when: WhenSpec,
    pub priority: Priority,
    pub status: Status,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Informational dependency graph (plan ids, order preserved, not
    /// cycle-checked).
    #[serde(default)]
    pub dependencies: Vec<RecordId>,
    pub status_history: Vec<StatusEntry>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ActionPlan {
    /// Materialize a plan from a draft.
    ///
    /// Seeds the history with one synthetic entry recording the transition
    /// from `pending` into the draft's initial status, whatever it is.
    pub fn new(id: RecordId, draft: CreatePlan, now: Timestamp, created_by: &str) -> Self {
        let seed = StatusEntry {
            from: Status::Pending,
            to: draft.status,
            changed_at: now,
            changed_by: created_by.to_string(),
        };
        Self {
            id,
            title: draft.title,
            what: draft.what,
            who: draft.who,
            when: draft.when,
            priority: draft.priority,
            status: draft.status,
            tags: draft.tags,
            dependencies: draft.dependencies,
            status_history: vec![seed],
            checklist: draft.checklist,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record a status transition.
    ///
    /// Appends a history entry and makes `to` the authoritative status.
    /// Returns `false` (and appends nothing) when `to` equals the current
    /// status.
    pub fn record_transition(&mut self, to: Status, now: Timestamp, changed_by: &str) -> bool {
        if to == self.status {
            return false;
        }
        self.status_history.push(StatusEntry {
            from: self.status,
            to,
            changed_at: now,
            changed_by: changed_by.to_string(),
        });
        self.status = to;
        self.updated_at = now;
        true
    }

    /// Merge a partial update into the plan.
    ///
    /// Non-status fields overwrite wholesale when present. A differing
    /// `status` goes through [`Self::record_transition`]. Returns `true`
    /// when the status actually changed.
    pub fn apply(&mut self, patch: UpdatePlan, now: Timestamp, actor: &str) -> bool {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(what) = patch.what {
            self.what = what;
        }
        if let Some(who) = patch.who {
            self.who = who;
        }
        if let Some(when) = patch.when {
            self.when = when;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(dependencies) = patch.dependencies {
            self.dependencies = dependencies;
        }
        if let Some(checklist) = patch.checklist {
            self.checklist = checklist;
        }
        self.updated_at = now;

        match patch.status {
            Some(to) => self.record_transition(to, now, actor),
            None => false,
        }
    }

    /// Timestamp of the transition into `completed`, for completed plans.
    pub fn completed_at(&self) -> Option<Timestamp> {
        if self.status != Status::Completed {
            return None;
        }
        self.status_history
            .iter()
            .rev()
            .find(|e| e.to == Status::Completed)
            .map(|e| e.changed_at)
    }

    /// Elapsed days from creation to completion, for completed plans.
    pub fn cycle_time_days(&self) -> Option<f64> {
        let completed = self.completed_at()?;
        Some(days_between(self.created_at, completed))
    }

    /// Days the plan has sat in its current status.
    pub fn days_in_status(&self, now: Timestamp) -> f64 {
        let since = self
            .status_history
            .last()
            .map(|e| e.changed_at)
            .unwrap_or(self.created_at);
        days_between(since, now)
    }

    /// Decode a plan document from the persistence collaborator.
    ///
    /// Timestamps are coerced through [`coerce_timestamp`] (anything
    /// unparseable becomes `now`). A missing or empty status history is
    /// re-seeded so the history invariant holds for hydrated records.
    /// Only `id` and `who` are hard requirements; everything else falls
    /// back to a neutral default, matching the store's permissiveness.
    pub fn from_document(doc: &serde_json::Value, now: Timestamp) -> Result<Self, CoreError> {
        let obj = doc
            .as_object()
            .ok_or_else(|| CoreError::Validation("plan document is not an object".into()))?;

        let id = obj
            .get("id")
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::Validation("plan document missing id".into()))?
            .to_string();

        let who: WhoSpec = obj
            .get("who")
            .cloned()
            .ok_or_else(|| CoreError::Validation(format!("plan {id} missing who")))
            .and_then(|v| {
                serde_json::from_value(v)
                    .map_err(|e| CoreError::Validation(format!("plan {id} who: {e}")))
            })?;

        let title = obj
            .get("title")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();

        let what: WhatSpec = decode_or_default(obj.get("what"));
        let priority: Priority = obj
            .get("priority")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(Priority::Medium);
        let status: Status = obj
            .get("status")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(Status::Pending);

        let created_at = coerce_timestamp(obj.get("created_at").unwrap_or(&serde_json::Value::Null), now);
        let updated_at = coerce_timestamp(obj.get("updated_at").unwrap_or(&serde_json::Value::Null), now);

        let when = decode_when(obj.get("when"), now);
        let status_history = decode_history(obj.get("status_history"), status, created_at, now);

        Ok(Self {
            id,
            title,
            what,
            who,
            when,
            priority,
            status,
            tags: decode_or_default(obj.get("tags")),
            dependencies: decode_or_default(obj.get("dependencies")),
            status_history,
            checklist: decode_or_default(obj.get("checklist")),
            created_at,
            updated_at,
        })
    }
}

fn decode_or_default<T: serde::de::DeserializeOwned + Default>(
    value: Option<&serde_json::Value>,
) -> T {
    value
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

fn decode_when(value: Option<&serde_json::Value>, now: Timestamp) -> WhenSpec {
    let obj = value.and_then(serde_json::Value::as_object);
    let due_date = obj
        .and_then(|o| o.get("due_date"))
        .map(|v| coerce_timestamp(v, now))
        .unwrap_or(now);
    let time_estimate_hours = obj
        .and_then(|o| o.get("time_estimate_hours"))
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(0.0);
    let reminder = obj
        .and_then(|o| o.get("reminder"))
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    WhenSpec {
        due_date,
        time_estimate_hours,
        reminder,
    }
}

fn decode_history(
    value: Option<&serde_json::Value>,
    status: Status,
    created_at: Timestamp,
    now: Timestamp,
) -> Vec<StatusEntry> {
    let mut entries = Vec::new();
    if let Some(items) = value.and_then(serde_json::Value::as_array) {
        for item in items {
            let Some(obj) = item.as_object() else { continue };
            let from: Option<Status> = obj
                .get("from")
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok());
            let to: Option<Status> = obj
                .get("to")
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok());
            let (Some(from), Some(to)) = (from, to) else { continue };
            entries.push(StatusEntry {
                from,
                to,
                changed_at: coerce_timestamp(obj.get("changed_at").unwrap_or(&serde_json::Value::Null), now),
                changed_by: obj
                    .get("changed_by")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            });
        }
    }
    if entries.is_empty() {
        // Re-seed so hydrated records keep the history invariant.
        entries.push(StatusEntry {
            from: Status::Pending,
            to: status,
            changed_at: created_at,
            changed_by: String::new(),
        });
    }
    entries
}

/// Fractional days between two instants (never negative).
pub fn days_between(start: Timestamp, end: Timestamp) -> f64 {
    let secs = (end - start).num_seconds();
    (secs.max(0) as f64) / 86_400.0
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Draft for creating a plan: every field except id, timestamps, and
/// history. The store accepts drafts as-is; `validate()` is opt-in for
/// callers that want a non-empty title and a positive time estimate.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct CreatePlan {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub what: WhatSpec,
    pub who: WhoSpec,
    #[validate(custom(function = validate_when))]
    pub when: WhenSpec,
    pub priority: Priority,
    pub status: Status,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<RecordId>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

fn validate_when(when: &WhenSpec) -> Result<(), validator::ValidationError> {
    if when.time_estimate_hours <= 0.0 {
        return Err(validator::ValidationError::new("time_estimate_hours")
            .with_message("time estimate must be positive".into()));
    }
    Ok(())
}

/// Partial update for a plan. Present fields overwrite; absent fields are
/// untouched. A present `status` goes through the transition machinery.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlan {
    pub title: Option<String>,
    pub what: Option<WhatSpec>,
    pub who: Option<WhoSpec>,
    pub when: Option<WhenSpec>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub tags: Option<Vec<String>>,
    pub dependencies: Option<Vec<RecordId>>,
    pub checklist: Option<Vec<ChecklistItem>>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
