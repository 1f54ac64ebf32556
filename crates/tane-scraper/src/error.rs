//! Error types for page extraction.

use thiserror::Error;

/// The page no longer matches the extraction contract.
///
/// Every variant carries the location being parsed so the failure can be
/// traced back to a page (and, for listing rows, a row).
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Fewer text fragments than the schema needs.
    #[error("{location}: missing field `{field}` at position {position} ({found} fragments found)")]
    MissingField {
        field: &'static str,
        position: usize,
        found: usize,
        location: String,
    },

    /// A structural element is absent.
    #[error("{location}: no element matches `{selector}`")]
    MissingElement {
        selector: &'static str,
        location: String,
    },

    /// The origin header is not `<customer> @ <organization> via`.
    #[error("{location}: malformed origin header `{header}`")]
    MalformedOrigin { header: String, location: String },

    /// A timestamp does not match the site's format.
    #[error("{location}: invalid timestamp `{value}`: {source}")]
    InvalidTimestamp {
        value: String,
        location: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A thread entry has a kind outside the known set.
    #[error("{location}: unknown response kind `{kind}`")]
    UnknownResponseKind { kind: String, location: String },

    /// A thread entry is older than the one before it.
    #[error("{location}: response #{index} is older than the one before it")]
    OutOfOrder { index: usize, location: String },
}

impl ScrapeError {
    /// The location (page, or page and row) that failed to parse.
    pub fn location(&self) -> &str {
        match self {
            Self::MissingField { location, .. }
            | Self::MissingElement { location, .. }
            | Self::MalformedOrigin { location, .. }
            | Self::InvalidTimestamp { location, .. }
            | Self::UnknownResponseKind { location, .. }
            | Self::OutOfOrder { location, .. } => location,
        }
    }
}

/// Result type alias for extraction.
pub type Result<T> = std::result::Result<T, ScrapeError>;
