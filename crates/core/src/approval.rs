//! Approval workflow attached to an action plan (at most one per plan).
//!
//! The workflow is a two-step state machine: `pending` resolves once to
//! `approved` or `rejected`, both terminal. Resolution is guarded by a
//! compare-and-set on the current status, making it first-write-wins by
//! construction: a second response is rejected rather than overwriting
//! the first.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{RecordId, Timestamp};

/// Status of an approval workflow. `approved` and `rejected` never revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    /// Whether this status is a terminal resolution.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// The approval workflow record for one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalWorkflow {
    pub action_plan_id: RecordId,
    pub requested_by: RecordId,
    pub approvers: Vec<RecordId>,
    pub status: ApprovalStatus,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub resolved_by: Option<RecordId>,
    #[serde(default)]
    pub resolved_at: Option<Timestamp>,
    pub requested_at: Timestamp,
}

impl ApprovalWorkflow {
    /// Open a new pending workflow.
    pub fn new(
        action_plan_id: RecordId,
        requested_by: RecordId,
        approvers: Vec<RecordId>,
        comments: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            action_plan_id,
            requested_by,
            approvers,
            status: ApprovalStatus::Pending,
            comments,
            resolved_by: None,
            resolved_at: None,
            requested_at: now,
        }
    }

    /// Resolve the workflow.
    ///
    /// Compare-and-set: only a `pending` workflow may resolve. A second
    /// response returns [`CoreError::Conflict`] and changes nothing, so the
    /// first resolution is the one that counts. Responding with `pending`
    /// itself is a validation error.
    pub fn respond(
        &mut self,
        resolution: ApprovalStatus,
        resolved_by: &str,
        comments: Option<String>,
        now: Timestamp,
    ) -> Result<(), CoreError> {
        if !resolution.is_terminal() {
            return Err(CoreError::Validation(
                "approval response must be approved or rejected".into(),
            ));
        }
        if self.status != ApprovalStatus::Pending {
            return Err(CoreError::Conflict(format!(
                "approval for plan {} is already resolved",
                self.action_plan_id
            )));
        }
        self.status = resolution;
        self.resolved_by = Some(resolved_by.to_string());
        self.resolved_at = Some(now);
        if comments.is_some() {
            self.comments = comments;
        }
        Ok(())
    }
}
