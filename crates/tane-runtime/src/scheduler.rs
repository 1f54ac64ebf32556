//! The watch loop.
//!
//! One poll clock decides when the listing is fetched. After each poll the
//! notification channels are checked in order; each has its own clock so
//! "new tickets" can nag every minute while "old tickets" reminds every ten.

use std::time::Duration;

use tane_models::Collection;
use tane_session::{NavigationOutcome, Session, SessionManager};
use tracing::{debug, info, warn};

use crate::channel::NotifyChannel;
use crate::clock::{IntervalClock, TimeSource};
use crate::config::WatchConfig;
use crate::error::{Result, RuntimeError};
use crate::event::{Exit, PollReport, SchedulerState, Step};
use crate::fetch::collect;
use crate::notifier::Notifier;

/// Title of the notification sent when the session expires mid-run.
pub const EXPIRED_TITLE: &str = "tane: session expired";
/// Body of the notification sent when the session expires mid-run.
pub const EXPIRED_MESSAGE: &str = "Noctane session failed or expired. Rerun tane to log in again.";

/// Polls the listing on a fixed interval and paces channel notifications.
pub struct Scheduler {
    manager: SessionManager,
    session: Session,
    config: WatchConfig,
    poll: IntervalClock,
    channels: Vec<NotifyChannel>,
    time: Box<dyn TimeSource>,
    notifier: Box<dyn Notifier>,
    state: SchedulerState,
}

impl Scheduler {
    /// Creates a scheduler with the default `new-tickets` and `old-tickets` channels.
    pub fn new(
        manager: SessionManager,
        session: Session,
        config: WatchConfig,
        time: Box<dyn TimeSource>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let channels = vec![
            NotifyChannel::new_tickets(config.new_interval),
            NotifyChannel::old_tickets(config.old_interval),
        ];
        Self {
            manager,
            session,
            poll: IntervalClock::new("poll", config.poll_interval),
            config,
            channels,
            time,
            notifier,
            state: SchedulerState::default(),
        }
    }

    /// Appends a channel; it is checked after the existing ones.
    pub fn with_channel(mut self, channel: NotifyChannel) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn poll_clock(&self) -> &IntervalClock {
        &self.poll
    }

    pub fn channels(&self) -> &[NotifyChannel] {
        &self.channels
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one iteration: sleep if the poll is not due, otherwise poll and notify.
    ///
    /// # Errors
    /// Session and extraction failures, and [`RuntimeError::UnexpectedPage`].
    /// The scheduler is [`SchedulerState::Failed`] afterwards.
    pub fn step(&mut self) -> Result<Step> {
        let now = self.time.now();
        if !self.poll.is_due(now) {
            self.state = SchedulerState::Sleeping;
            let wait = self.poll.remaining(now).max(self.config.min_sleep);
            debug!(now, wait_secs = wait.as_secs(), "waiting for next poll");
            return Ok(if self.time.sleep(wait) {
                Step::Slept
            } else {
                Step::Interrupted
            });
        }

        self.state = SchedulerState::Polling;
        let collection = match self.poll_once(now) {
            Ok(Some(collection)) => collection,
            Ok(None) => {
                self.state = SchedulerState::Failed;
                warn!("session expired");
                self.notifier.notify(EXPIRED_TITLE, EXPIRED_MESSAGE);
                return Ok(Step::Expired);
            }
            Err(e) => {
                self.state = SchedulerState::Failed;
                return Err(e);
            }
        };

        self.state = SchedulerState::Notifying;
        let mut report = PollReport {
            at: now,
            tickets: collection.tickets.len(),
            new_tickets: collection.new_tickets.len(),
            fired: Vec::new(),
        };
        if !self.notify_channels(now, &collection, &mut report.fired) {
            return Ok(Step::Interrupted);
        }

        info!(
            tickets = report.tickets,
            new_tickets = report.new_tickets,
            fired = ?report.fired,
            "poll complete"
        );
        Ok(Step::Polled(report))
    }

    /// Loop [`Scheduler::step`] until the session expires, an error occurs or
    /// shutdown is requested.
    pub fn run(&mut self) -> Result<Exit> {
        info!(
            poll_secs = self.config.poll_interval.as_secs(),
            detail = ?self.config.detail_level,
            channels = self.channels.len(),
            "watching tickets"
        );
        loop {
            match self.step()? {
                Step::Slept | Step::Polled(_) => {}
                Step::Expired => return Ok(Exit::Expired),
                Step::Interrupted => return Ok(Exit::Interrupted),
            }
        }
    }

    /// `None` when the listing or a detail navigation ended on the sign-in page.
    fn poll_once(&mut self, now: i64) -> Result<Option<Collection>> {
        match self.manager.ensure_loaded(&mut self.session)? {
            NavigationOutcome::Loaded(_) => {}
            NavigationOutcome::RedirectedToSignIn { .. } => return Ok(None),
            NavigationOutcome::UnexpectedPage(location) => {
                return Err(RuntimeError::UnexpectedPage(location))
            }
        }
        let collection = match collect(&self.manager, &mut self.session, self.config.detail_level) {
            Ok(collection) => collection,
            Err(RuntimeError::SessionExpired { location }) => {
                debug!(%location, "signed out while fetching ticket details");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        self.poll.fire(now);
        Ok(Some(collection))
    }

    /// Returns `false` if shutdown interrupted the grace period.
    fn notify_channels(&mut self, now: i64, collection: &Collection, fired: &mut Vec<String>) -> bool {
        for channel in &mut self.channels {
            if !channel.clock.is_due(now) {
                continue;
            }
            let Some(message) = channel.message(collection) else {
                continue;
            };
            if !fired.is_empty() && !sleep_grace(self.time.as_mut(), self.config.grace_period) {
                return false;
            }
            debug!(channel = %channel.name(), "notifying");
            self.notifier.notify(&channel.title, &message);
            channel.clock.fire(now);
            fired.push(channel.name().to_string());
        }
        true
    }
}

fn sleep_grace(time: &mut dyn TimeSource, grace: Duration) -> bool {
    debug!(grace_secs = grace.as_secs(), "grace period before next notification");
    time.sleep(grace)
}
