//! Bounded log of transient UI notifications.
//!
//! The log keeps the last `capacity` messages for the history view and fans
//! each new message out to live subscribers (the toast view). Subscribers
//! consume independently; a slow subscriber only lags itself.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::enums::NotificationLevel;

/// Default number of retained notifications.
pub const DEFAULT_CAPACITY: usize = 50;

/// A single message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Notification {
    pub id: u64,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Fixed-capacity ring buffer with broadcast fan-out.
#[derive(Debug)]
pub struct NotificationLog {
    capacity: usize,
    next_id: AtomicU64,
    entries: Mutex<VecDeque<Notification>>,
    sender: broadcast::Sender<Notification>,
}

impl NotificationLog {
    /// Create a log retaining at most `capacity` messages (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            capacity,
            next_id: AtomicU64::new(1),
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            sender,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a message, evicting the oldest one when full.
    pub fn push(&self, level: NotificationLevel, message: impl Into<String>) -> Notification {
        let notification = Notification {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            level,
            message: message.into(),
            created_at: Utc::now(),
        };

        {
            let mut entries = self.lock_entries();
            if entries.len() == self.capacity {
                entries.pop_front();
            }
            entries.push_back(notification.clone());
        }

        // No receivers is fine: the history still has it.
        let _ = self.sender.send(notification.clone());
        notification
    }

    pub fn info(&self, message: impl Into<String>) -> Notification {
        self.push(NotificationLevel::Info, message)
    }

    pub fn success(&self, message: impl Into<String>) -> Notification {
        self.push(NotificationLevel::Success, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Notification {
        self.push(NotificationLevel::Warning, message)
    }

    pub fn error(&self, message: impl Into<String>) -> Notification {
        self.push(NotificationLevel::Error, message)
    }

    /// The newest `count` messages, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<Notification> {
        let entries = self.lock_entries();
        let skip = entries.len().saturating_sub(count);
        entries.iter().skip(skip).cloned().collect()
    }

    /// Every retained message, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Notification> {
        self.lock_entries().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    /// Receive messages pushed after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, VecDeque<Notification>> {
        // A panic while holding the lock cannot leave the deque half-updated.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
