//! Responses in a ticket's conversation thread.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display format used for response timestamps in terminal output.
pub const RESPONSE_TIME_FORMAT: &str = "%H:%M %d/%m/%Y";

/// Visibility/origin of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseKind {
    /// The message that opened the ticket.
    TicketOpened,
    /// A comment only visible to engineers.
    InternalComment,
    /// A reply only visible to engineers.
    InternalReply,
    /// A reply sent to the customer.
    ExternalReply,
}

impl ResponseKind {
    /// Parses the kind label shown in a thread entry header (`"Internal Reply"`).
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Returns `None` for labels outside the known set.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        match normalized.as_str() {
            "internal comment" | "comment" => Some(Self::InternalComment),
            "internal reply" => Some(Self::InternalReply),
            "external reply" | "reply" => Some(Self::ExternalReply),
            _ => None,
        }
    }

    /// Stable upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TicketOpened => "TICKET_OPENED",
            Self::InternalComment => "INTERNAL_COMMENT",
            Self::InternalReply => "INTERNAL_REPLY",
            Self::ExternalReply => "EXTERNAL_REPLY",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a ticket's thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Author of the message.
    pub name: String,
    /// When the message was posted (remote local time, no zone).
    pub timestamp: NaiveDateTime,
    /// Body lines in document order.
    pub text: Vec<String>,
    /// Visibility/origin of the message.
    pub kind: ResponseKind,
}

impl Response {
    /// Creates a new response.
    pub fn new(
        name: impl Into<String>,
        timestamp: NaiveDateTime,
        text: Vec<String>,
        kind: ResponseKind,
    ) -> Self {
        Self {
            name: name.into(),
            timestamp,
            text,
            kind,
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;
        writeln!(f, "{}", self.name)?;
        write!(f, "{}", self.timestamp.format(RESPONSE_TIME_FORMAT))?;
        for line in &self.text {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}
