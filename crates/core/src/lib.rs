//! Pure domain layer for the 3W Action Plan Tracker.
//!
//! Record model (action plans, team members, comments, approvals,
//! projects), the status lifecycle helpers, filter predicates, identity
//! claims, and the metrics engine. This crate performs no I/O and holds
//! no shared state; all data is passed in by the caller.

pub mod activity;
pub mod approval;
pub mod attachment;
pub mod comment;
pub mod error;
pub mod filter;
pub mod identity;
pub mod metrics;
pub mod notification;
pub mod plan;
pub mod project;
pub mod team;
pub mod template;
pub mod types;
