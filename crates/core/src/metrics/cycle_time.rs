//! Cycle time statistics over completed plans.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metrics::mean;
use crate::plan::{ActionPlan, Priority};
use crate::types::RecordId;

/// Cycle time aggregates in days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleTimeMetrics {
    /// Mean over all completed plans; 0 when none.
    pub mean_days: f64,
    /// Nearest-rank median; 0 when no completed plans.
    pub median_days: f64,
    /// Nearest-rank 90th percentile; 0 when no completed plans.
    pub p90_days: f64,
    /// Mean cycle time grouped by priority (only priorities with data).
    pub by_priority: Vec<(Priority, f64)>,
    /// Mean cycle time grouped by primary assignee id.
    pub by_assignee: Vec<(RecordId, f64)>,
}

/// Compute cycle time statistics for a snapshot of plans.
///
/// Only completed plans contribute; an empty or completion-free snapshot
/// yields all-zero aggregates.
pub fn cycle_time_metrics(plans: &[ActionPlan]) -> CycleTimeMetrics {
    let mut all = Vec::new();
    let mut per_priority: BTreeMap<u8, (Priority, Vec<f64>)> = BTreeMap::new();
    let mut per_assignee: BTreeMap<RecordId, Vec<f64>> = BTreeMap::new();

    for plan in plans {
        let Some(days) = plan.cycle_time_days() else { continue };
        all.push(days);
        per_priority
            .entry(plan.priority.rank())
            .or_insert_with(|| (plan.priority, Vec::new()))
            .1
            .push(days);
        per_assignee
            .entry(plan.who.primary_assignee.id.clone())
            .or_default()
            .push(days);
    }

    let mut sorted = all.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    CycleTimeMetrics {
        mean_days: mean(&all),
        median_days: nearest_rank(&sorted, 50.0),
        p90_days: nearest_rank(&sorted, 90.0),
        // Most severe priority first.
        by_priority: per_priority
            .into_iter()
            .rev()
            .map(|(_, (priority, times))| (priority, mean(&times)))
            .collect(),
        by_assignee: per_assignee
            .into_iter()
            .map(|(id, times)| (id, mean(&times)))
            .collect(),
    }
}

/// Nearest-rank percentile over an ascending-sorted slice; 0 when empty.
fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (percentile / 100.0 * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{CreatePlan, ReminderSettings, Status, WhatSpec, WhenSpec, WhoSpec};
    use crate::team::TeamMember;
    use crate::types::Timestamp;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()
    }

    fn completed(id: &str, priority: Priority, assignee: &str, days: i64) -> ActionPlan {
        let draft = CreatePlan {
            title: id.to_string(),
            what: WhatSpec::default(),
            who: WhoSpec {
                primary_assignee: TeamMember::new(assignee, assignee, "x@example.com"),
                supporting_members: vec![],
                stakeholders: vec![],
            },
            when: WhenSpec {
                due_date: t0() + Duration::days(days),
                time_estimate_hours: 8.0,
                reminder: ReminderSettings::default(),
            },
            priority,
            status: Status::Pending,
            tags: vec![],
            dependencies: vec![],
            checklist: vec![],
        };
        let mut p = ActionPlan::new(id.into(), draft, t0(), assignee);
        p.record_transition(Status::Completed, t0() + Duration::days(days), assignee);
        p
    }

    #[test]
    fn empty_snapshot_is_all_zero() {
        let m = cycle_time_metrics(&[]);
        assert_eq!(m.mean_days, 0.0);
        assert_eq!(m.median_days, 0.0);
        assert_eq!(m.p90_days, 0.0);
        assert!(m.by_priority.is_empty());
        assert!(m.by_assignee.is_empty());
    }

    #[test]
    fn mean_median_p90_over_known_distribution() {
        let plans: Vec<ActionPlan> = (1..=10)
            .map(|d| completed(&format!("p{d}"), Priority::Medium, "m1", d))
            .collect();
        let m = cycle_time_metrics(&plans);
        assert!((m.mean_days - 5.5).abs() < 1e-9);
        // Nearest rank: median is the 5th of 10, p90 the 9th.
        assert!((m.median_days - 5.0).abs() < 1e-9);
        assert!((m.p90_days - 9.0).abs() < 1e-9);
    }

    #[test]
    fn single_sample_is_its_own_percentiles() {
        let plans = vec![completed("p1", Priority::High, "m1", 4)];
        let m = cycle_time_metrics(&plans);
        assert!((m.median_days - 4.0).abs() < 1e-9);
        assert!((m.p90_days - 4.0).abs() < 1e-9);
    }

    #[test]
    fn grouped_by_priority_most_severe_first() {
        let plans = vec![
            completed("p1", Priority::Low, "m1", 2),
            completed("p2", Priority::Critical, "m1", 6),
            completed("p3", Priority::Critical, "m1", 8),
        ];
        let m = cycle_time_metrics(&plans);
        assert_eq!(m.by_priority[0].0, Priority::Critical);
        assert!((m.by_priority[0].1 - 7.0).abs() < 1e-9);
        assert_eq!(m.by_priority[1].0, Priority::Low);
    }

    #[test]
    fn grouped_by_assignee() {
        let plans = vec![
            completed("p1", Priority::Low, "m1", 2),
            completed("p2", Priority::Low, "m2", 4),
            completed("p3", Priority::Low, "m2", 6),
        ];
        let m = cycle_time_metrics(&plans);
        let m2 = m.by_assignee.iter().find(|(id, _)| id == "m2").unwrap();
        assert!((m2.1 - 5.0).abs() < 1e-9);
    }

    #[test]
    fn active_plans_do_not_contribute() {
        let mut active = completed("p1", Priority::Low, "m1", 2);
        active.record_transition(Status::InProgress, t0() + Duration::days(3), "m1");
        let m = cycle_time_metrics(&[active]);
        assert_eq!(m.mean_days, 0.0);
        assert!(m.by_assignee.is_empty());
    }
}
