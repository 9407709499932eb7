//! Notification records.
//!
//! Notifications are fire-and-forget side effects of mentions and approval
//! activity. The kind is a closed tagged variant, one case per trigger,
//! each carrying only the fields it needs; the `read` flag toggles
//! independently of the triggering event.

use serde::{Deserialize, Serialize};

use crate::approval::ApprovalStatus;
use crate::types::{RecordId, Timestamp};

/// The trigger that produced a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationKind {
    /// The recipient was mentioned in a comment.
    Mention {
        comment_id: RecordId,
        mentioned_by: RecordId,
    },
    /// The recipient was asked to approve a plan.
    ApprovalRequested { requested_by: RecordId },
    /// A plan the recipient requested approval for was resolved.
    ApprovalResolved {
        resolution: ApprovalStatus,
        resolved_by: RecordId,
    },
    /// A reminder the recipient configured came due.
    ReminderDue { due_date: Timestamp },
}

/// A notification addressed to one team member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    pub recipient: RecordId,
    pub action_plan_id: RecordId,
    #[serde(flatten)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub read: bool,
    pub created_at: Timestamp,
}
