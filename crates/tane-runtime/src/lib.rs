//! Watch loop for tane.
//!
//! This crate turns an authenticated [`tane_session::Session`] into
//! notifications:
//! - [`collect`] - listing page to [`tane_models::Collection`], with detail
//!   fetches per [`tane_models::DetailLevel`]
//! - [`Scheduler`] - poll clock plus paced [`NotifyChannel`]s
//! - [`Notifier`] - desktop or log sink
//! - [`TimeSource`] - wall clock and interruptible sleep
//!
//! # Example
//!
//! ```no_run
//! use tane_runtime::{
//!     register_shutdown_signals, DesktopNotifier, Scheduler, SystemTimeSource, WatchConfig,
//! };
//! use tane_session::{HttpClient, SessionManager, SiteConfig, TerminalPrompt};
//! use std::time::Duration;
//!
//! let manager = SessionManager::new(SiteConfig::default());
//! let mut prompt = TerminalPrompt::new(None);
//! let session = manager.login(Box::new(HttpClient::new().unwrap()), &mut prompt).unwrap();
//!
//! let time = SystemTimeSource::with_shutdown_flag(register_shutdown_signals().unwrap());
//! let mut scheduler = Scheduler::new(
//!     manager,
//!     session,
//!     WatchConfig::default(),
//!     Box::new(time),
//!     Box::new(DesktopNotifier::new(Duration::from_secs(10))),
//! );
//! let exit = scheduler.run().unwrap();
//! println!("stopped: {:?}", exit);
//! ```

pub mod channel;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod fetch;
pub mod notifier;
pub mod scheduler;

pub use channel::{notification_line, NotifyChannel, TicketSet};
pub use clock::{register_shutdown_signals, IntervalClock, SystemTimeSource, TimeSource};
pub use config::{WatchConfig, LONG_POLL_INTERVAL};
pub use error::{Result, RuntimeError};
pub use event::{Exit, PollReport, SchedulerState, Step};
pub use fetch::collect;
pub use notifier::{DesktopNotifier, LogNotifier, Notifier};
pub use scheduler::{Scheduler, EXPIRED_MESSAGE, EXPIRED_TITLE};
