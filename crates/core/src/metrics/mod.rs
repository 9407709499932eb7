//! Metrics engine: pure, read-only functions over a snapshot of plans.
//!
//! No state, no side effects; safe to recompute on every read. Inputs are
//! assumed well-formed. Empty collections produce zeroed aggregates, never
//! NaN; division by zero resolves to 0.

pub mod bottleneck;
pub mod cycle_time;
pub mod dashboard;
pub mod forecast;

pub use bottleneck::{bottleneck_report, risk_score, BottleneckEntry};
pub use cycle_time::{cycle_time_metrics, CycleTimeMetrics};
pub use dashboard::{
    dashboard_stats, priority_distribution, team_performance, DashboardStats, MemberPerformance,
    PriorityDistribution,
};
pub use forecast::{completion_forecasts, Forecast, ForecastBasis, ForecastConfidence};

/// Mean of a slice; 0 when empty.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
