//! Scheduler states and step results.

use std::fmt;

/// Where the scheduler is in its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// Waiting for the next poll.
    #[default]
    Sleeping,
    /// Loading and collecting the listing.
    Polling,
    /// Emitting channel notifications.
    Notifying,
    /// Stopped for good: session expired or a poll failed.
    Failed,
}

impl SchedulerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sleeping => "sleeping",
            Self::Polling => "polling",
            Self::Notifying => "notifying",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What happened in one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Epoch seconds at which the poll ran.
    pub at: i64,
    pub tickets: usize,
    pub new_tickets: usize,
    /// Channels that fired, in emission order.
    pub fired: Vec<String>,
}

/// Result of one scheduler step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Not time to poll yet; slept toward the boundary.
    Slept,
    /// Polled the listing.
    Polled(PollReport),
    /// The site sent us to sign in again.
    Expired,
    /// A sleep was cut short by shutdown.
    Interrupted,
}

/// Why [`crate::Scheduler::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Session expired mid-run; rerun to log in again.
    Expired,
    /// Shutdown requested by the operator.
    Interrupted,
}
