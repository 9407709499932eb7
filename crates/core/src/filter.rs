//! Filtering and sorting of plan collections.
//!
//! Each non-empty filter dimension is ANDed with the others; multiple
//! values within one dimension are ORed. The search dimension is a
//! case-insensitive substring match against title, description, or primary
//! assignee name, and participates in the AND like every other dimension.

use serde::{Deserialize, Serialize};

use crate::plan::{ActionPlan, Priority, Status};
use crate::types::{RecordId, Timestamp};

/// Filter over a plan collection. Empty dimensions impose no constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanFilter {
    #[serde(default)]
    pub statuses: Vec<Status>,
    #[serde(default)]
    pub priorities: Vec<Priority>,
    /// Matches the primary assignee or any supporting member.
    #[serde(default)]
    pub assignees: Vec<RecordId>,
    /// Inclusive lower bound on the due date, when set.
    #[serde(default)]
    pub due_after: Option<Timestamp>,
    /// Inclusive upper bound on the due date, when set.
    #[serde(default)]
    pub due_before: Option<Timestamp>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Case-insensitive substring query; empty means no constraint.
    #[serde(default)]
    pub search: String,
}

impl PlanFilter {
    /// Whether a plan passes every active dimension of this filter.
    pub fn matches(&self, plan: &ActionPlan) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&plan.status) {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&plan.priority) {
            return false;
        }
        if !self.assignees.is_empty() {
            let hit = self.assignees.contains(&plan.who.primary_assignee.id)
                || plan
                    .who
                    .supporting_members
                    .iter()
                    .any(|m| self.assignees.contains(&m.id));
            if !hit {
                return false;
            }
        }
        if let Some(start) = self.due_after {
            if plan.when.due_date < start {
                return false;
            }
        }
        if let Some(end) = self.due_before {
            if plan.when.due_date > end {
                return false;
            }
        }
        if !self.tags.is_empty() && !plan.tags.iter().any(|t| self.tags.contains(t)) {
            return false;
        }
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let hit = plan.title.to_lowercase().contains(&needle)
                || plan.what.description.to_lowercase().contains(&needle)
                || plan
                    .who
                    .primary_assignee
                    .name
                    .to_lowercase()
                    .contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Sort key for plan listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    DueDate,
    Priority,
    CreatedAt,
    Title,
}

/// Sort a borrowed plan list in place.
///
/// `Priority` orders by severity, critical first. Ties keep the incoming
/// order (stable sort); `descending` reverses the result.
pub fn sort_plans(plans: &mut [&ActionPlan], key: SortKey, descending: bool) {
    match key {
        SortKey::DueDate => plans.sort_by_key(|p| p.when.due_date),
        SortKey::Priority => plans.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        SortKey::CreatedAt => plans.sort_by_key(|p| p.created_at),
        SortKey::Title => plans.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase())),
    }
    if descending {
        plans.reverse();
    }
}
