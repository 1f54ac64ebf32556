//! Interval clocks and the time source the scheduler sleeps on.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use signal_hook::consts::{SIGINT, SIGTERM};

/// A named "last fired" timestamp with a minimum spacing.
///
/// Times are epoch seconds. A fresh clock has `last_fired = 0`, so it is due
/// on the first check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalClock {
    pub name: String,
    pub interval: Duration,
    pub last_fired: i64,
}

impl IntervalClock {
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            interval,
            last_fired: 0,
        }
    }

    /// First second at which the clock is no longer due to wait.
    pub fn boundary(&self) -> i64 {
        self.last_fired
            .saturating_add(i64::try_from(self.interval.as_secs()).unwrap_or(i64::MAX))
    }

    /// Strictly past the boundary.
    pub fn is_due(&self, now: i64) -> bool {
        now > self.boundary()
    }

    /// Time left until the boundary, zero when already there.
    pub fn remaining(&self, now: i64) -> Duration {
        Duration::from_secs(u64::try_from(self.boundary() - now).unwrap_or(0))
    }

    pub fn fire(&mut self, now: i64) {
        self.last_fired = now;
    }
}

/// Wall clock and sleep, injected so the scheduler can run on fake time.
pub trait TimeSource {
    /// Current time in epoch seconds.
    fn now(&self) -> i64;

    /// Sleep for `duration`. Returns `false` when interrupted by shutdown.
    fn sleep(&mut self, duration: Duration) -> bool;
}

const SLEEP_SLICE: Duration = Duration::from_millis(250);

/// Real time, with sleeps cut short when the shutdown flag is raised.
#[derive(Debug, Clone, Default)]
pub struct SystemTimeSource {
    shutdown: Arc<AtomicBool>,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an existing shutdown flag.
    pub fn with_shutdown_flag(shutdown: Arc<AtomicBool>) -> Self {
        Self { shutdown }
    }

    /// The flag checked between sleep slices.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }

    fn sleep(&mut self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                return false;
            }
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return true;
            }
            thread::sleep(left.min(SLEEP_SLICE));
        }
    }
}

/// Raise the returned flag on SIGINT or SIGTERM.
///
/// A second SIGINT while the flag is already set terminates the process
/// immediately.
pub fn register_shutdown_signals() -> io::Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register_conditional_shutdown(SIGINT, 1, Arc::clone(&flag))?;
    signal_hook::flag::register(SIGINT, Arc::clone(&flag))?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&flag))?;
    Ok(flag)
}
