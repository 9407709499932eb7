//! Reusable plan templates.

use serde::{Deserialize, Serialize};

use crate::plan::{
    ChecklistItem, CreatePlan, Priority, ReminderSettings, Status, WhatSpec, WhenSpec, WhoSpec,
};
use crate::types::{RecordId, Timestamp};

/// A reusable starting point for action plans: the What plus defaults for
/// priority, estimate, tags, and checklist. Who and When are supplied at
/// instantiation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: RecordId,
    pub name: String,
    pub what: WhatSpec,
    pub priority: Priority,
    pub time_estimate_hours: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

impl Template {
    /// Produce a draft from this template. Instantiated plans always start
    /// in `pending`.
    pub fn instantiate(&self, title: impl Into<String>, who: WhoSpec, due_date: Timestamp) -> CreatePlan {
        CreatePlan {
            title: title.into(),
            what: self.what.clone(),
            who,
            when: WhenSpec {
                due_date,
                time_estimate_hours: self.time_estimate_hours,
                reminder: ReminderSettings::default(),
            },
            priority: self.priority,
            status: Status::Pending,
            tags: self.tags.clone(),
            dependencies: Vec::new(),
            checklist: self.checklist.clone(),
        }
    }
}
