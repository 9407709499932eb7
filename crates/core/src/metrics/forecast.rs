//! Completion forecasting for active plans.
//!
//! Projects a completion date from the assignee's history of completed
//! plans at the same priority, falling back to the team-wide history and
//! finally to the plan's own time estimate.

use chrono::Duration;
use serde::Serialize;

use crate::metrics::mean;
use crate::plan::{ActionPlan, Status};
use crate::types::{RecordId, Timestamp};

/// Sample count at or above which a forecast is high confidence.
pub const HIGH_CONFIDENCE_SAMPLES: usize = 3;

/// Confidence of a projected completion date, derived from how many
/// same-assignee same-priority historical completions back it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastConfidence {
    High,
    Medium,
    Low,
}

impl ForecastConfidence {
    /// `high` at 3+ samples, `medium` at 1-2, `low` otherwise.
    pub fn from_sample_count(count: usize) -> Self {
        if count >= HIGH_CONFIDENCE_SAMPLES {
            Self::High
        } else if count > 0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Which history backed a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastBasis {
    /// Assignee's completed plans at the same priority.
    AssigneeHistory,
    /// Team-wide mean cycle time.
    TeamHistory,
    /// The plan's own time estimate (no history at all).
    TimeEstimate,
}

/// Projected completion for one active plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub plan_id: RecordId,
    pub projected: Timestamp,
    pub confidence: ForecastConfidence,
    pub basis: ForecastBasis,
    pub sample_count: usize,
}

/// Forecast completion for every non-completed plan in the snapshot.
///
/// The projection is `created_at` plus the basis duration, floored at
/// `now`: a forecast is never in the past.
pub fn completion_forecasts(plans: &[ActionPlan], now: Timestamp) -> Vec<Forecast> {
    let team_history: Vec<f64> = plans.iter().filter_map(ActionPlan::cycle_time_days).collect();

    plans
        .iter()
        .filter(|p| p.status != Status::Completed)
        .map(|plan| {
            let samples: Vec<f64> = plans
                .iter()
                .filter(|other| {
                    other.priority == plan.priority
                        && other.who.primary_assignee.id == plan.who.primary_assignee.id
                })
                .filter_map(|other| other.cycle_time_days())
                .collect();

            let (basis, base_days, sample_count) = if !samples.is_empty() {
                (ForecastBasis::AssigneeHistory, mean(&samples), samples.len())
            } else if !team_history.is_empty() {
                (ForecastBasis::TeamHistory, mean(&team_history), 0)
            } else {
                (ForecastBasis::TimeEstimate, plan.when.time_estimate_hours / 24.0, 0)
            };

            let projected = plan.created_at + days_to_duration(base_days);
            Forecast {
                plan_id: plan.id.clone(),
                projected: projected.max(now),
                confidence: ForecastConfidence::from_sample_count(sample_count),
                basis,
                sample_count,
            }
        })
        .collect()
}

fn days_to_duration(days: f64) -> Duration {
    Duration::seconds((days.max(0.0) * 86_400.0) as i64)
}
