//! Notification channels: which tickets to report and how often.

use std::time::Duration;

use tane_core::{one_line, truncate};
use tane_models::{Collection, Ticket, RESPONSE_TIME_FORMAT};

use crate::clock::IntervalClock;

const DESCRIPTION_WIDTH: usize = 40;
const CUSTOMER_WIDTH: usize = 20;

/// Which part of a [`Collection`] a channel reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketSet {
    /// Due and overdue tickets.
    New,
    /// Existing tickets.
    Existing,
}

impl TicketSet {
    pub fn select(self, collection: &Collection) -> &[Ticket] {
        match self {
            Self::New => &collection.new_tickets,
            Self::Existing => &collection.tickets,
        }
    }
}

/// A notification title, the tickets it reports and its pacing clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyChannel {
    pub clock: IntervalClock,
    pub title: String,
    pub tickets: TicketSet,
}

impl NotifyChannel {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        tickets: TicketSet,
        interval: Duration,
    ) -> Self {
        Self {
            clock: IntervalClock::new(name, interval),
            title: title.into(),
            tickets,
        }
    }

    /// The `new-tickets` channel.
    pub fn new_tickets(interval: Duration) -> Self {
        Self::new("new-tickets", "New tickets", TicketSet::New, interval)
    }

    /// The `old-tickets` channel.
    pub fn old_tickets(interval: Duration) -> Self {
        Self::new("old-tickets", "Old tickets", TicketSet::Existing, interval)
    }

    pub fn name(&self) -> &str {
        &self.clock.name
    }

    /// Notification body for this channel's tickets, or `None` when there are none.
    pub fn message(&self, collection: &Collection) -> Option<String> {
        let tickets = self.tickets.select(collection);
        if tickets.is_empty() {
            return None;
        }
        Some(
            tickets
                .iter()
                .map(notification_line)
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

/// `<timestamp> <description> (<customer>)`, with both texts flattened to one
/// line and truncated.
///
/// The timestamp is the latest response for complete tickets and the
/// listing's latest-activity date for summaries.
pub fn notification_line(ticket: &Ticket) -> String {
    let stamp = match ticket.complete() {
        Some(complete) => complete
            .most_recent()
            .timestamp
            .format(RESPONSE_TIME_FORMAT)
            .to_string(),
        None => ticket.summary().date_latest.clone(),
    };
    let summary = ticket.summary();
    format!(
        "{} {} ({})",
        stamp,
        truncate(&one_line(&summary.description), DESCRIPTION_WIDTH),
        truncate(&one_line(&summary.customer_name), CUSTOMER_WIDTH)
    )
}
