use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::models::{Notification, NotificationKind};

/// Receives user-visible notifications raised by the position views.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log only. Useful for headless runs.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => {
                error!(title = %notification.title, "{}", notification.message)
            }
            NotificationKind::Warning => {
                warn!(title = %notification.title, "{}", notification.message)
            }
            NotificationKind::Info | NotificationKind::Success => {
                info!(title = %notification.title, "{}", notification.message)
            }
        }
    }
}

/// Buffers notifications until the UI drains them. Clones share the buffer.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    pending: Arc<Mutex<VecDeque<Notification>>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push_back(notification),
            Err(poisoned) => poisoned.into_inner().push_back(notification),
        }
    }
}
