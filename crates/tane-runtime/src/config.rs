//! Watch loop configuration.

use std::time::Duration;

use tane_models::DetailLevel;

use crate::error::{Result, RuntimeError};

/// Poll intervals above this let overdue tickets pile up between checks.
pub const LONG_POLL_INTERVAL: Duration = Duration::from_secs(600);

/// Configuration for the watch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    /// How often the listing page is polled.
    pub poll_interval: Duration,
    /// Minimum spacing between "new tickets" notifications.
    pub new_interval: Duration,
    /// Minimum spacing between "old tickets" notifications.
    pub old_interval: Duration,
    /// Pause between two notifications fired in the same iteration.
    pub grace_period: Duration,
    /// Shortest sleep while waiting for the next poll.
    pub min_sleep: Duration,
    /// Which rows get a detail fetch.
    pub detail_level: DetailLevel,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            new_interval: Duration::from_secs(60),
            old_interval: Duration::from_secs(600),
            grace_period: Duration::from_secs(10),
            min_sleep: Duration::from_secs(2),
            detail_level: DetailLevel::Summary,
        }
    }
}

impl WatchConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the "new tickets" notification interval.
    pub fn with_new_interval(mut self, interval: Duration) -> Self {
        self.new_interval = interval;
        self
    }

    /// Sets the "old tickets" notification interval.
    pub fn with_old_interval(mut self, interval: Duration) -> Self {
        self.old_interval = interval;
        self
    }

    /// Sets the grace period between notifications.
    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    /// Sets the detail level.
    pub fn with_detail_level(mut self, level: DetailLevel) -> Self {
        self.detail_level = level;
        self
    }

    /// Rejects a zero poll interval.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(RuntimeError::InvalidConfig(
                "check interval must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the poll interval is long enough to let overdue tickets accumulate.
    pub fn is_long_poll(&self) -> bool {
        self.poll_interval > LONG_POLL_INTERVAL
    }
}
