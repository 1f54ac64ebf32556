//! Ticket types.
//!
//! A listing page yields [`TicketSummary`] rows. A detail fetch upgrades a
//! summary into a [`TicketComplete`]. [`Ticket`] is whichever of the two the
//! configured [`DetailLevel`] produced for a row.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::response::{Response, RESPONSE_TIME_FORMAT};

/// Row category on the listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketCategory {
    /// Already acknowledged tickets.
    Existing,
    /// Tickets waiting for a first response.
    Due,
    /// Tickets past their response deadline.
    Overdue,
}

/// How many listing rows get a full detail fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLevel {
    /// Keep every row as a summary.
    #[default]
    Summary,
    /// Fetch complete records for due and overdue rows only.
    NewOnly,
    /// Fetch complete records for every row.
    All,
}

impl DetailLevel {
    /// Maps a repeat count (`-d`, `-dd`) to a level, saturating at [`DetailLevel::All`].
    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Self::Summary,
            1 => Self::NewOnly,
            _ => Self::All,
        }
    }

    /// Whether rows of the given category get a detail fetch at this level.
    pub fn fetches(&self, category: TicketCategory) -> bool {
        match self {
            Self::Summary => false,
            Self::NewOnly => category != TicketCategory::Existing,
            Self::All => true,
        }
    }
}

/// Summary data from one listing row, taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSummary {
    pub ticket_number: String,
    pub description: String,
    /// Site-relative path of the ticket's detail page.
    pub url: String,
    pub customer_company: String,
    pub customer_name: String,
    pub engineer_name: String,
    pub engineer_status: String,
    pub ticket_status: String,
    pub date_opened: String,
    pub date_latest: String,
}

impl fmt::Display for TicketSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = [
            &self.ticket_number,
            &self.description,
            &self.url,
            &self.customer_company,
            &self.customer_name,
            &self.engineer_name,
            &self.engineer_status,
            &self.date_opened,
            &self.date_latest,
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

/// A ticket with its full conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketComplete {
    /// The listing row this record was fetched for.
    pub summary: TicketSummary,
    /// Whether the page shows a "response due" badge.
    pub response_needed: bool,
    pub organization_name: String,
    /// The message that opened the ticket.
    pub origin_response: Response,
    /// Later responses in chronological order, origin excluded.
    pub responses: Vec<Response>,
}

impl TicketComplete {
    /// The latest response, or the origin when nobody has replied yet.
    pub fn most_recent(&self) -> &Response {
        self.responses.last().unwrap_or(&self.origin_response)
    }
}

impl fmt::Display for TicketComplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Response Needed: {}", self.response_needed)?;
        writeln!(f, "{}", self.origin_response)?;
        write!(f, "======================")?;
        for response in &self.responses {
            write!(
                f,
                "\nFrom {} on {}",
                response.name,
                response.timestamp.format(RESPONSE_TIME_FORMAT)
            )?;
        }
        Ok(())
    }
}

/// A listing row at whatever detail level was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "detail", rename_all = "snake_case")]
pub enum Ticket {
    Summary(TicketSummary),
    Complete(Box<TicketComplete>),
}

impl Ticket {
    /// The ticket number shared by both forms.
    pub fn ticket_number(&self) -> &str {
        &self.summary().ticket_number
    }

    /// Summary-level view of either form.
    pub fn summary(&self) -> &TicketSummary {
        match self {
            Self::Summary(summary) => summary,
            Self::Complete(complete) => &complete.summary,
        }
    }

    /// The complete record, if one was fetched.
    pub fn complete(&self) -> Option<&TicketComplete> {
        match self {
            Self::Summary(_) => None,
            Self::Complete(complete) => Some(complete),
        }
    }
}

impl From<TicketSummary> for Ticket {
    fn from(summary: TicketSummary) -> Self {
        Self::Summary(summary)
    }
}

impl From<TicketComplete> for Ticket {
    fn from(complete: TicketComplete) -> Self {
        Self::Complete(Box::new(complete))
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary(summary) => summary.fmt(f),
            Self::Complete(complete) => write!(f, "{}\n{}", complete.summary, complete),
        }
    }
}

/// Rows of one listing page, partitioned by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub existing: Vec<TicketSummary>,
    pub due: Vec<TicketSummary>,
    pub overdue: Vec<TicketSummary>,
}

impl Listing {
    /// Total number of rows across all categories.
    pub fn len(&self) -> usize {
        self.existing.len() + self.due.len() + self.overdue.len()
    }

    /// Whether the page listed no tickets at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rows of one category.
    pub fn category(&self, category: TicketCategory) -> &[TicketSummary] {
        match category {
            TicketCategory::Existing => &self.existing,
            TicketCategory::Due => &self.due,
            TicketCategory::Overdue => &self.overdue,
        }
    }
}

/// Result of one poll: old tickets and tickets that need attention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Rows from the `existing` category.
    pub tickets: Vec<Ticket>,
    /// Rows from `due` followed by `overdue`.
    pub new_tickets: Vec<Ticket>,
}
