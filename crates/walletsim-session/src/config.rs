//! Session store configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use walletsim_traits::{Result, WalletsimError};

/// Configuration for a [`SessionStore`](crate::SessionStore)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of transactions kept in history
    pub history_capacity: usize,
    /// Delay between submission and resolution, in milliseconds
    pub resolution_delay_ms: u64,
    /// Probability in `[0, 1]` that a transaction resolves to `Success`
    pub success_rate: f64,
    /// Display duration of success/info notifications, in milliseconds
    pub short_notice_ms: u64,
    /// Display duration of error and resolution notifications, in milliseconds
    pub long_notice_ms: u64,
    /// Buffered notifications per subscriber before the oldest are dropped
    pub event_capacity: usize,
}

impl SessionConfig {
    /// Creates a configuration with the default values
    pub fn new() -> Self {
        Self {
            history_capacity: 5,
            resolution_delay_ms: 3000,
            success_rate: 0.7,
            short_notice_ms: 3000,
            long_notice_ms: 5000,
            event_capacity: 64,
        }
    }

    /// Sets the history capacity
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Sets the resolution delay
    pub fn with_resolution_delay(mut self, delay: Duration) -> Self {
        self.resolution_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Sets the success probability used by the default settlement
    pub fn with_success_rate(mut self, rate: f64) -> Self {
        self.success_rate = rate;
        self
    }

    /// Sets the notification channel capacity
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Resolution delay as a duration
    pub fn resolution_delay(&self) -> Duration {
        Duration::from_millis(self.resolution_delay_ms)
    }

    /// Short notification duration
    pub fn short_notice(&self) -> Duration {
        Duration::from_millis(self.short_notice_ms)
    }

    /// Long notification duration
    pub fn long_notice(&self) -> Duration {
        Duration::from_millis(self.long_notice_ms)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(WalletsimError::Config("history_capacity must be positive".into()));
        }
        if self.event_capacity == 0 {
            return Err(WalletsimError::Config("event_capacity must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.success_rate) {
            return Err(WalletsimError::Config(format!(
                "success_rate must be within [0, 1], got {}",
                self.success_rate
            )));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}
