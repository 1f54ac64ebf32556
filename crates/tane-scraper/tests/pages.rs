//! Extraction against whole pages shaped like the live site.

use chrono::{NaiveDate, Timelike};
use tane_models::{ResponseKind, TicketCategory};
use tane_scraper::{extract_complete, extract_summaries, ScrapeError};

const LISTING: &str = r#"<!DOCTYPE html>
<html>
<head><title>Tickets Assigned to Me &#8211; Noctane</title></head>
<body>
  <table id="tickets">
    <thead><tr><th>#</th><th>Subject</th><th>Customer</th><th>Engineer</th><th>Status</th></tr></thead>
    <tbody>
      <tr class="ticket">
        <td class="number">T-1</td>
        <td class="subject"><a href="/noc/tickets/T-1">T-1</a> <span>Printer down</span></td>
        <td class="customer"><span>/foo</span><br><span>Acme</span></td>
        <td class="engineer"><span>Bob</span> <em>Alice</em></td>
        <td class="state"><span>Open</span><i>/* */</i></td>
        <td class="status">Open</td>
        <td class="opened">2024-01-01</td>
        <td class="latest">2024-01-02</td>
      </tr>
    </tbody>
  </table>
</body>
</html>"#;

const DETAIL: &str = r#"<!DOCTYPE html>
<html>
<head><title>Ticket T-1 &#8211; Noctane</title></head>
<body>
  <div class="original_ticket healthy reply">
    <div class="header"><strong>Jane Doe @ Acme via web</strong> <span>&middot;</span></div>
    <div class="time">January 5, 2024 @ 02:30 PM</div>
    <div class="body"><p>Help!</p></div>
  </div>
  <ul class="ticket_responses">
  </ul>
</body>
</html>"#;

#[test]
fn test_listing_scenario_single_existing_row() {
    let listing = extract_summaries("https://noctane.test/noc/tickets/mine", LISTING).unwrap();

    assert_eq!(listing.category(TicketCategory::Existing).len(), 1);
    assert!(listing.due.is_empty());
    assert!(listing.overdue.is_empty());

    let row = &listing.existing[0];
    assert_eq!(row.ticket_number, "T-1");
    assert_eq!(row.description, "Printer down");
    assert_eq!(row.url, "/noc/tickets/T-1");
    assert_eq!(row.customer_company, "/foo");
    assert_eq!(row.customer_name, "Acme");
    assert_eq!(row.ticket_status, "/* */");
    assert_eq!(row.date_opened, "Open");
    assert_eq!(row.date_latest, "2024-01-01");
}

#[test]
fn test_detail_scenario_origin_only() {
    let listing = extract_summaries("https://noctane.test/noc/tickets/mine", LISTING).unwrap();
    let summary = listing.existing[0].clone();

    let ticket = extract_complete(summary, "https://noctane.test/noc/tickets/T-1", DETAIL).unwrap();

    assert_eq!(ticket.organization_name, "Acme");
    assert_eq!(ticket.origin_response.name, "Jane Doe");
    assert_eq!(ticket.origin_response.kind, ResponseKind::TicketOpened);
    assert_eq!(ticket.origin_response.text, vec!["Help!".to_string()]);
    assert_eq!(
        ticket.origin_response.timestamp.date(),
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    );
    assert_eq!(ticket.origin_response.timestamp.hour(), 14);
    assert!(ticket.responses.is_empty());
    assert_eq!(ticket.most_recent(), &ticket.origin_response);
}

#[test]
fn test_listing_page_given_to_detail_extractor() {
    let listing = extract_summaries("https://noctane.test/noc/tickets/mine", LISTING).unwrap();

    let err = extract_complete(
        listing.existing[0].clone(),
        "https://noctane.test/noc/tickets/mine",
        LISTING,
    )
    .unwrap_err();

    assert!(matches!(err, ScrapeError::MissingElement { .. }));
    assert_eq!(err.location(), "https://noctane.test/noc/tickets/mine");
}
