//! Extraction of ticket data from Noctane pages.
//!
//! - [`listing`]: the "tickets assigned to me" page, one [`TicketSummary`]
//!   per row, grouped by category.
//! - [`detail`]: a ticket page, upgraded into a [`TicketComplete`].
//!
//! Both extractors fail loudly with a [`ScrapeError`] naming the location and
//! the part of the page that no longer matches.
//!
//! [`TicketSummary`]: tane_models::TicketSummary
//! [`TicketComplete`]: tane_models::TicketComplete

pub mod detail;
pub mod error;
pub mod fragments;
pub mod listing;

pub use detail::{extract_complete, TIMESTAMP_FORMAT};
pub use error::{Result, ScrapeError};
pub use fragments::text_fragments;
pub use listing::{
    extract_summaries, ListingExtractor, ListingField, DEFAULT_TICKET_PATH_PREFIX, LISTING_SCHEMA,
};
