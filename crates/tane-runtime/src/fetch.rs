//! Ticket collection from the loaded listing page.

use tane_models::{Collection, DetailLevel, Ticket, TicketCategory, TicketSummary};
use tane_scraper::{extract_complete, ListingExtractor};
use tane_session::{Session, SessionError, SessionManager};
use tracing::{debug, info};

use crate::error::{Result, RuntimeError};

/// Turn the listing page currently loaded in `session` into a [`Collection`].
///
/// `existing` rows become `tickets`; `due` then `overdue` rows become
/// `new_tickets`. Rows selected by `detail_level` get their detail page
/// fetched and parsed, one after another. Any failure aborts the whole call;
/// a detail fetch that lands on the sign-in page is
/// [`RuntimeError::SessionExpired`].
///
/// Call after [`SessionManager::ensure_loaded`] returned `Loaded`.
pub fn collect(
    manager: &SessionManager,
    session: &mut Session,
    detail_level: DetailLevel,
) -> Result<Collection> {
    let page = session.page().cloned().ok_or(SessionError::NoPage)?;
    let listing = ListingExtractor::new(manager.site().ticket_path_prefix.clone())
        .extract(&page.location, &page.body)?;

    let mut collection = Collection::default();
    for category in [
        TicketCategory::Existing,
        TicketCategory::Due,
        TicketCategory::Overdue,
    ] {
        let fetch = detail_level.fetches(category);
        for summary in listing.category(category) {
            let ticket = if fetch {
                fetch_complete(manager, session, summary.clone())?
            } else {
                Ticket::Summary(summary.clone())
            };
            debug!(ticket = %ticket.ticket_number(), ?category, "collected\n{}", ticket);

            match category {
                TicketCategory::Existing => collection.tickets.push(ticket),
                TicketCategory::Due | TicketCategory::Overdue => collection.new_tickets.push(ticket),
            }
        }
    }

    info!(
        tickets = collection.tickets.len(),
        new_tickets = collection.new_tickets.len(),
        ?detail_level,
        "tickets collected"
    );
    Ok(collection)
}

fn fetch_complete(
    manager: &SessionManager,
    session: &mut Session,
    summary: TicketSummary,
) -> Result<Ticket> {
    let page = manager.open(session, &summary.url)?;
    if manager.site().is_sign_in(&page.location) {
        return Err(RuntimeError::SessionExpired {
            location: page.location,
        });
    }
    let complete = extract_complete(summary, &page.location, &page.body)?;
    Ok(complete.into())
}
