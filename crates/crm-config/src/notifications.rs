//! Notification log configuration.

use crm_core::notifications::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

const fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotificationsConfig {
    /// Maximum number of notifications retained in history.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl NotificationsConfig {
    /// Check the configured capacity.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `capacity` is zero.
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        if self.capacity == 0 {
            return Err(crate::ConfigError::InvalidValue {
                field: "notifications.capacity".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}
