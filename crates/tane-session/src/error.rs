//! Error types for session operations.

use thiserror::Error;

/// Errors that can occur while driving the remote session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Navigation landed on a page other than the expected one.
    ///
    /// Carries the page identity (title or location) so callers can decide
    /// whether to re-authenticate or give up.
    #[error("unexpected page: {page}")]
    WrongPage { page: String },

    /// Every login attempt was rejected.
    #[error("session failed on {last_title}")]
    SessionFailure { last_title: String },

    /// HTTP transport error.
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),

    /// An operation needed a current page but nothing was loaded yet.
    #[error("no page loaded")]
    NoPage,

    /// The requested form does not exist on the current page.
    #[error("form #{index} not found on {location}")]
    FormNotFound { index: usize, location: String },

    /// A location or form action could not be resolved.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Reading credentials from the terminal failed.
    #[error("credential prompt failed: {0}")]
    Prompt(#[from] std::io::Error),
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
