//! File attachments, held in a separate index keyed by plan id.

use serde::{Deserialize, Serialize};

use crate::types::{RecordId, Timestamp};

/// A file attached to an action plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: RecordId,
    pub action_plan_id: RecordId,
    pub file_name: String,
    pub url: String,
    pub size_bytes: u64,
    pub uploaded_by: RecordId,
    pub uploaded_at: Timestamp,
}
