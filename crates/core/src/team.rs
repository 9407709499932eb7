//! Team member records and availability.

use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// Current availability of a team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Busy,
    Away,
    Offline,
}

/// Rolling performance counters maintained by the roster collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub tasks_completed: u32,
    pub average_rating: f64,
    pub on_time_delivery_pct: f64,
}

/// A member of the team roster.
///
/// Owned by the roster collaborator; referenced by id from action plans
/// and projects but not exclusively owned by either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub availability: Availability,
    #[serde(default)]
    pub performance: Option<PerformanceMetrics>,
}

impl TeamMember {
    /// Minimal constructor for the required fields.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: None,
            department: None,
            skills: Vec::new(),
            availability: Availability::Available,
            performance: None,
        }
    }
}
