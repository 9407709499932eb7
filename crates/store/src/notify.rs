//! Fire-and-forget notification delivery.
//!
//! `send` is synchronous and infallible from the store's point of view:
//! no delivery confirmation, no retry. Implementations that talk to a real
//! channel are expected to hand off internally (spawn, queue) rather than
//! block the mutation that triggered the notification.

use std::sync::Mutex;

use threew_core::notification::Notification;

/// Outbound notification channel.
pub trait NotificationChannel: Send + Sync {
    fn send(&self, notification: &Notification);
}

/// Channel that only emits a structured log line per notification.
#[derive(Debug, Default)]
pub struct LogChannel;

impl NotificationChannel for LogChannel {
    fn send(&self, notification: &Notification) {
        tracing::info!(
            notification_id = %notification.id,
            recipient = %notification.recipient,
            plan_id = %notification.action_plan_id,
            "Notification sent"
        );
    }
}

/// Test double that records everything sent through it.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("channel lock poisoned").clone()
    }
}

impl NotificationChannel for RecordingChannel {
    fn send(&self, notification: &Notification) {
        self.sent
            .lock()
            .expect("channel lock poisoned")
            .push(notification.clone());
    }
}
