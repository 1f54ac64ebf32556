//! Ticket list extraction.
//!
//! The listing page is a table whose rows carry a class naming their
//! category. Cells are not labelled, so a row is read as a flat sequence of
//! text fragments and mapped by position through [`LISTING_SCHEMA`].

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tane_models::{Listing, TicketCategory, TicketSummary};
use tracing::debug;

use crate::error::{Result, ScrapeError};
use crate::fragments::text_fragments;

/// Default site-relative prefix of ticket detail pages.
pub const DEFAULT_TICKET_PATH_PREFIX: &str = "/noc/tickets/";

static EXISTING_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"tr[class="ticket"]"#).expect("valid selector"));
static DUE_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"tr[class="ticket due"]"#).expect("valid selector"));
static OVERDUE_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"tr[class="ticket overdue"]"#).expect("valid selector"));

/// One position in a listing row's fragment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingField {
    TicketNumber,
    /// The number again, from the row's link.
    TicketNumberRepeat,
    Description,
    CustomerCompany,
    CustomerName,
    EngineerName,
    EngineerStatus,
    /// Icon text between the engineer and ticket status cells.
    Marker,
    TicketStatus,
    DateOpened,
    DateLatest,
}

/// Fragment positions of a listing row, in order.
pub const LISTING_SCHEMA: [ListingField; 11] = [
    ListingField::TicketNumber,
    ListingField::TicketNumberRepeat,
    ListingField::Description,
    ListingField::CustomerCompany,
    ListingField::CustomerName,
    ListingField::EngineerName,
    ListingField::EngineerStatus,
    ListingField::Marker,
    ListingField::TicketStatus,
    ListingField::DateOpened,
    ListingField::DateLatest,
];

impl ListingField {
    /// The field expected at `position`, if the schema has one.
    pub fn at(position: usize) -> Option<Self> {
        LISTING_SCHEMA.get(position).copied()
    }

    /// Position of this field in a row.
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TicketNumber => "ticket_number",
            Self::TicketNumberRepeat => "ticket_number_repeat",
            Self::Description => "description",
            Self::CustomerCompany => "customer_company",
            Self::CustomerName => "customer_name",
            Self::EngineerName => "engineer_name",
            Self::EngineerStatus => "engineer_status",
            Self::Marker => "marker",
            Self::TicketStatus => "ticket_status",
            Self::DateOpened => "date_opened",
            Self::DateLatest => "date_latest",
        }
    }
}

/// A row's fragments after they were checked against [`LISTING_SCHEMA`].
struct ListingRow(Vec<String>);

impl ListingRow {
    fn validate(fragments: Vec<String>, location: &str) -> Result<Self> {
        match ListingField::at(fragments.len()) {
            Some(field) => Err(ScrapeError::MissingField {
                field: field.name(),
                position: field.position(),
                found: fragments.len(),
                location: location.to_string(),
            }),
            None => Ok(Self(fragments)),
        }
    }

    fn get(&self, field: ListingField) -> String {
        self.0[field.position()].clone()
    }
}

/// Reads listing pages into [`Listing`] values.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    ticket_path_prefix: String,
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_TICKET_PATH_PREFIX)
    }
}

impl ListingExtractor {
    /// Creates an extractor building ticket URLs as `<prefix><ticket number>`.
    pub fn new(ticket_path_prefix: impl Into<String>) -> Self {
        Self {
            ticket_path_prefix: ticket_path_prefix.into(),
        }
    }

    /// Extract every row of the listing page, grouped by category.
    ///
    /// # Errors
    /// [`ScrapeError::MissingField`] when any row has fewer fragments than the
    /// schema; the location names the page and the row.
    pub fn extract(&self, location: &str, body: &str) -> Result<Listing> {
        let document = Html::parse_document(body);

        let listing = Listing {
            existing: self.rows(&document, &EXISTING_ROW, TicketCategory::Existing, location)?,
            due: self.rows(&document, &DUE_ROW, TicketCategory::Due, location)?,
            overdue: self.rows(&document, &OVERDUE_ROW, TicketCategory::Overdue, location)?,
        };

        debug!(
            location = %location,
            existing = listing.existing.len(),
            due = listing.due.len(),
            overdue = listing.overdue.len(),
            "listing extracted"
        );
        Ok(listing)
    }

    fn rows(
        &self,
        document: &Html,
        selector: &Selector,
        category: TicketCategory,
        location: &str,
    ) -> Result<Vec<TicketSummary>> {
        document
            .select(selector)
            .enumerate()
            .map(|(index, row)| {
                let row_location = format!("{} ({:?} row {})", location, category, index);
                let row = ListingRow::validate(text_fragments(row), &row_location)?;
                Ok(self.summary(&row))
            })
            .collect()
    }

    fn summary(&self, row: &ListingRow) -> TicketSummary {
        let ticket_number = row.get(ListingField::TicketNumber);
        TicketSummary {
            url: format!("{}{}", self.ticket_path_prefix, ticket_number),
            ticket_number,
            description: row.get(ListingField::Description),
            customer_company: row.get(ListingField::CustomerCompany),
            customer_name: row.get(ListingField::CustomerName),
            engineer_name: row.get(ListingField::EngineerName),
            engineer_status: row.get(ListingField::EngineerStatus),
            ticket_status: row.get(ListingField::TicketStatus),
            date_opened: row.get(ListingField::DateOpened),
            date_latest: row.get(ListingField::DateLatest),
        }
    }
}

/// Extract a listing page using the default ticket path prefix.
pub fn extract_summaries(location: &str, body: &str) -> Result<Listing> {
    ListingExtractor::default().extract(location, body)
}
