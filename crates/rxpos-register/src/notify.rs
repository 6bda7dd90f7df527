//! # Notifications
//!
//! Fire-and-forget toasts. The register reports backend failures and
//! completed actions here; nothing waits for an acknowledgement.

use std::sync::{Mutex, PoisonError};

use tracing::{error, info};

/// Where user-facing messages go.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
    fn notify_success(&self, message: &str);
}

/// Default notifier: writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_error(&self, message: &str) {
        error!(target: "rxpos::notify", "{}", message);
    }

    fn notify_success(&self, message: &str) {
        info!(target: "rxpos::notify", "{}", message);
    }
}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Error(String),
    Success(String),
}

/// Keeps every notification in memory, for tests and for UIs that poll.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        MemoryNotifier::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Error(m) => Some(m.clone()),
                Notification::Success(_) => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|n| match n {
                Notification::Success(m) => Some(m.clone()),
                Notification::Error(_) => None,
            })
            .collect()
    }

    /// Drops everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for MemoryNotifier {
    fn notify_error(&self, message: &str) {
        self.lock().push(Notification::Error(message.to_string()));
    }

    fn notify_success(&self, message: &str) {
        self.lock().push(Notification::Success(message.to_string()));
    }
}
