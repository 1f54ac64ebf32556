//! Notification sinks.

use std::time::Duration;

use notify_rust::{Notification, Timeout};
use tracing::{info, warn};

/// Receives notifications. Delivery is fire-and-forget.
pub trait Notifier {
    fn notify(&mut self, title: &str, message: &str);
}

/// Desktop popups through the session's notification daemon.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    expire: Duration,
}

impl DesktopNotifier {
    /// Popups close after `expire`.
    pub fn new(expire: Duration) -> Self {
        Self { expire }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&mut self, title: &str, message: &str) {
        let millis = u32::try_from(self.expire.as_millis()).unwrap_or(u32::MAX);
        let shown = Notification::new()
            .appname("tane")
            .summary(title)
            .body(message)
            .timeout(Timeout::Milliseconds(millis))
            .show();

        match shown {
            Ok(_) => info!(title = %title, "notification shown"),
            Err(e) => warn!(title = %title, error = %e, "failed to show notification"),
        }
    }
}

/// Writes notifications to the log instead of the desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, title: &str, message: &str) {
        info!(title = %title, "notification\n{}", message);
    }
}
