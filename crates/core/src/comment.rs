//! Comments on action plans, with mentions and emoji reactions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::team::TeamMember;
use crate::types::{RecordId, Timestamp};

/// One emoji reaction on a comment.
///
/// Duplicates are allowed: reactions are counted, not deduplicated per
/// user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub emoji: String,
    pub user_id: RecordId,
    pub timestamp: Timestamp,
}

/// A comment belonging to exactly one action plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: RecordId,
    pub action_plan_id: RecordId,
    pub author: TeamMember,
    pub content: String,
    pub created_at: Timestamp,
    /// Team member ids mentioned in the content.
    #[serde(default)]
    pub mentions: Vec<RecordId>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Comment {
    /// Per-emoji reaction totals, in stable (sorted) emoji order.
    pub fn reaction_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for r in &self.reactions {
            *counts.entry(r.emoji.clone()).or_insert(0) += 1;
        }
        counts
    }
}
