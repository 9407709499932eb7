//! Bottleneck analysis: age-in-status and a 0-100 risk score.

use serde::Serialize;

use crate::plan::{ActionPlan, Priority, Status};
use crate::types::{RecordId, Timestamp};

/// Age contribution saturates here so priority and status keep weight on
/// very old plans.
const AGE_CAP: f64 = 40.0;
/// Risk points per day in the current status.
const AGE_POINTS_PER_DAY: f64 = 4.0;

/// One non-completed plan ranked by bottleneck risk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BottleneckEntry {
    pub plan_id: RecordId,
    pub title: String,
    pub status: Status,
    pub priority: Priority,
    pub days_in_status: f64,
    pub risk_score: f64,
}

/// Bottleneck risk score in 0-100.
///
/// Formula: `priority.risk_weight() + status.risk_weight() +
/// min(days_in_status × 4, 40)`, clamped to 100. Monotonic in both age and
/// priority severity; at equal age and priority a blocked plan scores
/// strictly above an in-progress one because of the status weight.
pub fn risk_score(priority: Priority, status: Status, days_in_status: f64) -> f64 {
    let age = (days_in_status.max(0.0) * AGE_POINTS_PER_DAY).min(AGE_CAP);
    (priority.risk_weight() + status.risk_weight() + age).min(100.0)
}

/// Rank every non-completed plan by risk, highest first.
pub fn bottleneck_report(plans: &[ActionPlan], now: Timestamp) -> Vec<BottleneckEntry> {
    let mut entries: Vec<BottleneckEntry> = plans
        .iter()
        .filter(|p| p.status != Status::Completed)
        .map(|p| {
            let days_in_status = p.days_in_status(now);
            BottleneckEntry {
                plan_id: p.id.clone(),
                title: p.title.clone(),
                status: p.status,
                priority: p.priority,
                days_in_status,
                risk_score: risk_score(p.priority, p.status, days_in_status),
            }
        })
        .collect();
    entries.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    entries
}
