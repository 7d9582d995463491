//! services/site/src/adapters/toast.rs
//!
//! An adapter for the `Notifier` port that queues toasts until the host
//! flushes them to the client.

use portfolio_core::domain::{Notification, NotificationVariant};
use portfolio_core::ports::Notifier;
use std::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Mutex<Vec<Notification>>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every queued toast, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Default => {
                info!(title = %notification.title, "{}", notification.description)
            }
            NotificationVariant::Destructive => {
                warn!(title = %notification.title, "{}", notification.description)
            }
        }
        match self.pending.lock() {
            Ok(mut pending) => pending.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
