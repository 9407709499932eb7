//! In-memory working set for the 3W Action Plan Tracker.
//!
//! [`store::PlanStore`] holds the session's authoritative record set and
//! runs the lifecycle & activity engine; [`persistence`] defines the
//! document-store boundary (with an in-memory implementation); [`notify`]
//! defines the fire-and-forget notification channel.

pub mod notify;
pub mod persistence;
pub mod store;

pub use notify::{LogChannel, NotificationChannel, RecordingChannel};
pub use persistence::{DocumentStore, InMemoryDocumentStore, PersistenceError};
pub use store::PlanStore;
