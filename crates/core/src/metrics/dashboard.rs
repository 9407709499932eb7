//! Dashboard aggregates: status counts, completion rate, priority
//! distribution, and per-member performance.

use serde::Serialize;

use crate::metrics::mean;
use crate::plan::{ActionPlan, Priority, Status};
use crate::team::TeamMember;
use crate::types::RecordId;

/// Top-line dashboard numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub blocked: usize,
    pub completed: usize,
    /// completed / total × 100; 0 when there are no plans.
    pub completion_rate: f64,
    /// Mean cycle time in days over completed plans only; 0 when none.
    pub avg_completion_days: f64,
}

/// Compute the dashboard stats for a snapshot of plans.
pub fn dashboard_stats(plans: &[ActionPlan]) -> DashboardStats {
    let mut stats = DashboardStats {
        total: plans.len(),
        pending: 0,
        in_progress: 0,
        blocked: 0,
        completed: 0,
        completion_rate: 0.0,
        avg_completion_days: 0.0,
    };
    for plan in plans {
        match plan.status {
            Status::Pending => stats.pending += 1,
            Status::InProgress => stats.in_progress += 1,
            Status::Blocked => stats.blocked += 1,
            Status::Completed => stats.completed += 1,
        }
    }
    if stats.total > 0 {
        stats.completion_rate = stats.completed as f64 / stats.total as f64 * 100.0;
    }
    let cycle_times: Vec<f64> = plans.iter().filter_map(ActionPlan::cycle_time_days).collect();
    stats.avg_completion_days = mean(&cycle_times);
    stats
}

/// Counts per priority bucket.
///
/// Critical is tracked by its own dashboard widget and deliberately
/// excluded from this aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriorityDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Count plans per high/medium/low priority bucket.
pub fn priority_distribution(plans: &[ActionPlan]) -> PriorityDistribution {
    let mut dist = PriorityDistribution::default();
    for plan in plans {
        match plan.priority {
            Priority::High => dist.high += 1,
            Priority::Medium => dist.medium += 1,
            Priority::Low => dist.low += 1,
            Priority::Critical => {}
        }
    }
    dist
}

/// Per-member workload and throughput summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberPerformance {
    pub member_id: RecordId,
    pub name: String,
    /// Completed plans where this member is the primary assignee.
    pub completed: usize,
    /// Plans currently in progress for this member.
    pub in_progress: usize,
    /// Mean days-to-complete over this member's completed plans; 0 when none.
    pub avg_completion_days: f64,
}

/// Compute per-member performance over a snapshot.
///
/// Every roster member gets a row, including members with no plans.
pub fn team_performance(plans: &[ActionPlan], members: &[TeamMember]) -> Vec<MemberPerformance> {
    members
        .iter()
        .map(|member| {
            let mine: Vec<&ActionPlan> = plans
                .iter()
                .filter(|p| p.who.primary_assignee.id == member.id)
                .collect();
            let cycle_times: Vec<f64> =
                mine.iter().filter_map(|p| p.cycle_time_days()).collect();
            MemberPerformance {
                member_id: member.id.clone(),
                name: member.name.clone(),
                completed: mine.iter().filter(|p| p.status == Status::Completed).count(),
                in_progress: mine.iter().filter(|p| p.status == Status::InProgress).count(),
                avg_completion_days: mean(&cycle_times),
            }
        })
        .collect()
}
