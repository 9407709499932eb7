//! Append-only activity log entries.
//!
//! One entry is appended per mutation on an action plan. Entries are never
//! updated or deleted individually; the only removal path is the cascade
//! when the parent plan is deleted. Reads return timestamp-descending
//! order.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp};

/// What kind of mutation produced an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Created,
    Updated,
    StatusChanged,
    Commented,
    AttachmentAdded,
    ChecklistToggled,
    ApprovalRequested,
    ApprovalResolved,
    Duplicated,
}

/// One activity log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: RecordId,
    pub action_plan_id: RecordId,
    pub kind: ActivityKind,
    /// Team member id of whoever performed the mutation.
    pub actor: RecordId,
    /// Short human-readable description of the change.
    pub detail: String,
    pub at: Timestamp,
}
