//! Error types for the runtime crate.

use thiserror::Error;

/// Errors that end a poll or the watch loop.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Session, login or transport error.
    #[error(transparent)]
    Session(#[from] tane_session::SessionError),

    /// A page no longer matches the extraction contract.
    #[error("scraping failed: {0}")]
    Scrape(#[from] tane_scraper::ScrapeError),

    /// A navigation during collection was sent to the sign-in page.
    #[error("session expired: redirected to {location}")]
    SessionExpired { location: String },

    /// The listing navigation landed somewhere other than the listing or sign-in page.
    #[error("unexpected page: {0}")]
    UnexpectedPage(String),

    /// Rejected configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
