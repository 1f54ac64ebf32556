//! Ticket detail extraction.
//!
//! A detail page has an origin block (who opened the ticket, when, and the
//! opening message) and a thread list. The thread starts with a copy of the
//! origin, followed by the replies newest first.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};
use tane_models::{Response, ResponseKind, TicketComplete, TicketSummary};
use tracing::{debug, trace};

use crate::error::{Result, ScrapeError};
use crate::fragments::text_fragments;

/// Timestamp format used by the origin block and thread entries.
pub const TIMESTAMP_FORMAT: &str = "%B %d, %Y @ %I:%M %p";

const ORIGIN_SELECTOR: &str = r#"div[class="original_ticket healthy reply"]"#;
const THREAD_SELECTOR: &str = r#"ul[class="ticket_responses"]"#;

static RESPONSE_DUE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"span[class="response_due_badge"]"#).expect("valid selector")
});
static ORIGIN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(ORIGIN_SELECTOR).expect("valid selector"));
static THREAD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(THREAD_SELECTOR).expect("valid selector"));

const ORIGIN_PREFIX: &str = "Ticket created by ";
const ORIGIN_TIMESTAMP: usize = 2;
const ENTRY_KIND: usize = 0;
const ENTRY_AUTHOR: usize = 1;
const ENTRY_TIMESTAMP: usize = 2;

/// Extract the full record of one ticket from its detail page.
///
/// # Errors
/// Any [`ScrapeError`] when the page does not match the expected structure.
pub fn extract_complete(
    summary: TicketSummary,
    location: &str,
    body: &str,
) -> Result<TicketComplete> {
    let document = Html::parse_document(body);

    let response_needed = document.select(&RESPONSE_DUE).next().is_some();

    let origin = document
        .select(&ORIGIN)
        .next()
        .ok_or_else(|| ScrapeError::MissingElement {
            selector: ORIGIN_SELECTOR,
            location: location.to_string(),
        })?;
    let (organization_name, origin_response) = parse_origin(origin, location)?;

    let thread = document
        .select(&THREAD)
        .next()
        .ok_or_else(|| ScrapeError::MissingElement {
            selector: THREAD_SELECTOR,
            location: location.to_string(),
        })?;

    let mut entries: Vec<ElementRef<'_>> = thread.children().filter_map(ElementRef::wrap).collect();
    entries.reverse();
    entries.pop();

    let responses = entries
        .into_iter()
        .map(|entry| parse_entry(entry, location))
        .collect::<Result<Vec<_>>>()?;

    check_order(&origin_response, &responses, location)?;

    debug!(
        ticket = %summary.ticket_number,
        responses = responses.len(),
        response_needed,
        "ticket detail extracted"
    );

    Ok(TicketComplete {
        summary,
        response_needed,
        organization_name,
        origin_response,
        responses,
    })
}

/// Returns the organization name and the opening response.
fn parse_origin(origin: ElementRef<'_>, location: &str) -> Result<(String, Response)> {
    let fragments = text_fragments(origin);
    require(&fragments, ORIGIN_TIMESTAMP, "timestamp", location)?;

    let header = &fragments[0];
    let header_text = header.strip_prefix(ORIGIN_PREFIX).unwrap_or(header);
    let (customer, rest) =
        header_text
            .split_once(" @ ")
            .ok_or_else(|| ScrapeError::MalformedOrigin {
                header: header.clone(),
                location: location.to_string(),
            })?;
    let organization = match rest.rfind(" via") {
        Some(end) => &rest[..end],
        None => rest.strip_suffix("via").unwrap_or(rest),
    };

    let timestamp = parse_timestamp(&fragments[ORIGIN_TIMESTAMP], location)?;
    let text = fragments[ORIGIN_TIMESTAMP + 1..].to_vec();
    trace!(customer = %customer, organization = %organization, "origin parsed");

    Ok((
        organization.trim().to_string(),
        Response::new(customer.trim(), timestamp, text, ResponseKind::TicketOpened),
    ))
}

fn parse_entry(entry: ElementRef<'_>, location: &str) -> Result<Response> {
    let fragments = text_fragments(entry);
    require(&fragments, ENTRY_TIMESTAMP, "timestamp", location)?;

    let label = &fragments[ENTRY_KIND];
    let label_text = label.strip_suffix(" from").unwrap_or(label);
    let kind = ResponseKind::from_label(label_text).ok_or_else(|| {
        ScrapeError::UnknownResponseKind {
            kind: label.clone(),
            location: location.to_string(),
        }
    })?;

    let timestamp = parse_timestamp(&fragments[ENTRY_TIMESTAMP], location)?;
    Ok(Response::new(
        fragments[ENTRY_AUTHOR].as_str(),
        timestamp,
        fragments[ENTRY_TIMESTAMP + 1..].to_vec(),
        kind,
    ))
}

/// Fails with `MissingField` unless `fragments[position]` exists.
fn require(fragments: &[String], position: usize, field: &'static str, location: &str) -> Result<()> {
    if fragments.len() > position {
        Ok(())
    } else {
        Err(ScrapeError::MissingField {
            field,
            position,
            found: fragments.len(),
            location: location.to_string(),
        })
    }
}

fn parse_timestamp(value: &str, location: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
        ScrapeError::InvalidTimestamp {
            value: value.to_string(),
            location: location.to_string(),
            source,
        }
    })
}

fn check_order(origin: &Response, responses: &[Response], location: &str) -> Result<()> {
    let mut previous = origin.timestamp;
    for (index, response) in responses.iter().enumerate() {
        if response.timestamp < previous {
            return Err(ScrapeError::OutOfOrder {
                index,
                location: location.to_string(),
            });
        }
        previous = response.timestamp;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const LOCATION: &str = "https://noctane.test/noc/tickets/12345";

    fn summary() -> TicketSummary {
        TicketSummary {
            ticket_number: "12345".to_string(),
            description: "Server down".to_string(),
            url: "/noc/tickets/12345".to_string(),
            customer_company: "Acme".to_string(),
            customer_name: "Jane Doe".to_string(),
            engineer_name: "Bob".to_string(),
            engineer_status: "Away".to_string(),
            ticket_status: "Open".to_string(),
            date_opened: "2024-01-01".to_string(),
            date_latest: "2024-01-02".to_string(),
        }
    }

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    const ORIGIN_BLOCK: &str = r#"<div class="original_ticket healthy reply">
        <p class="by">Jane Doe @ Acme via web</p>
        <span class="sep">|</span>
        <p class="when">January 5, 2024 @ 02:30 PM</p>
        <div class="body"><p>Help!</p></div>
    </div>"#;

    fn entry(kind: &str, author: &str, when: &str, body: &str) -> String {
        format!(
            "<li><h4>{} from</h4><b>{}</b><em>{}</em><p>{}</p></li>",
            kind, author, when, body
        )
    }

    /// Thread markup: the origin copy first, then `replies` newest first.
    fn thread(replies: &[String]) -> String {
        let origin_copy = entry("Ticket", "Jane Doe", "January 5, 2024 @ 02:30 PM", "Help!");
        format!(
            "<ul class=\"ticket_responses\">\n{}\n{}\n</ul>",
            origin_copy,
            replies.join("\n")
        )
    }

    fn page(parts: &[&str]) -> String {
        format!("<html><head><title>Ticket</title></head><body>{}</body></html>", parts.concat())
    }

    #[test]
    fn test_origin_only_ticket() {
        let body = page(&[ORIGIN_BLOCK, &thread(&[])]);

        let ticket = extract_complete(summary(), LOCATION, &body).unwrap();

        assert!(!ticket.response_needed);
        assert_eq!(ticket.organization_name, "Acme");
        assert_eq!(
            ticket.origin_response,
            Response::new(
                "Jane Doe",
                at(5, 14, 30),
                vec!["Help!".to_string()],
                ResponseKind::TicketOpened
            )
        );
        assert!(ticket.responses.is_empty());
        assert_eq!(ticket.most_recent(), &ticket.origin_response);
        assert_eq!(ticket.summary.ticket_number, "12345");
    }

    #[test]
    fn test_thread_reversed_to_chronological() {
        let replies = [
            entry("External Reply", "Bob", "January 6, 2024 @ 09:00 AM", "Fixed."),
            entry("Internal Comment", "Carol", "January 5, 2024 @ 03:15 PM", "Looking."),
        ];
        let body = page(&[
            r#"<span class="response_due_badge">Response due</span>"#,
            ORIGIN_BLOCK,
            &thread(&replies),
        ]);

        let ticket = extract_complete(summary(), LOCATION, &body).unwrap();

        assert!(ticket.response_needed);
        assert_eq!(ticket.responses.len(), 2);
        assert_eq!(ticket.responses[0].name, "Carol");
        assert_eq!(ticket.responses[0].kind, ResponseKind::InternalComment);
        assert_eq!(ticket.responses[0].timestamp, at(5, 15, 15));
        assert_eq!(ticket.responses[1].name, "Bob");
        assert_eq!(ticket.responses[1].kind, ResponseKind::ExternalReply);
        assert_eq!(ticket.responses[1].text, vec!["Fixed.".to_string()]);
        assert_eq!(ticket.most_recent().name, "Bob");
    }

    #[test]
    fn test_origin_with_created_by_prefix() {
        let origin = r#"<div class="original_ticket healthy reply">
            <p>Ticket created by Jane Doe @ Acme Corp via</p><a>email</a>
            <p>January 5, 2024 @ 02:30 PM</p><p>Line one</p><p>Line two</p>
        </div>"#;
        let body = page(&[origin, &thread(&[])]);

        let ticket = extract_complete(summary(), LOCATION, &body).unwrap();

        assert_eq!(ticket.organization_name, "Acme Corp");
        assert_eq!(ticket.origin_response.name, "Jane Doe");
        assert_eq!(
            ticket.origin_response.text,
            vec!["Line one".to_string(), "Line two".to_string()]
        );
    }

    #[test]
    fn test_missing_origin_block() {
        let body = page(&[&thread(&[])]);
        let err = extract_complete(summary(), LOCATION, &body).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingElement { selector, .. } if selector == ORIGIN_SELECTOR));
        assert_eq!(err.location(), LOCATION);
    }

    #[test]
    fn test_missing_thread() {
        let body = page(&[ORIGIN_BLOCK]);
        let err = extract_complete(summary(), LOCATION, &body).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingElement { selector, .. } if selector == THREAD_SELECTOR));
    }

    #[test]
    fn test_malformed_origin_header() {
        let origin = r#"<div class="original_ticket healthy reply">
            <p>Jane Doe from Acme</p><p>|</p><p>January 5, 2024 @ 02:30 PM</p></div>"#;
        let body = page(&[origin, &thread(&[])]);
        let err = extract_complete(summary(), LOCATION, &body).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedOrigin { .. }));
    }

    #[test]
    fn test_invalid_timestamp() {
        let origin = r#"<div class="original_ticket healthy reply">
            <p>Jane Doe @ Acme via web</p><p>|</p><p>2024-01-05 14:30</p></div>"#;
        let body = page(&[origin, &thread(&[])]);
        let err = extract_complete(summary(), LOCATION, &body).unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidTimestamp { value, .. } if value == "2024-01-05 14:30"));
    }

    #[test]
    fn test_short_origin_is_missing_field() {
        let origin = r#"<div class="original_ticket healthy reply"><p>Jane Doe @ Acme via web</p></div>"#;
        let body = page(&[origin, &thread(&[])]);
        let err = extract_complete(summary(), LOCATION, &body).unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::MissingField { field: "timestamp", position: 2, found: 1, .. }
        ));
    }

    #[test]
    fn test_unknown_response_kind() {
        let replies = [entry("Carrier Pigeon", "Bob", "January 6, 2024 @ 09:00 AM", "Coo.")];
        let body = page(&[ORIGIN_BLOCK, &thread(&replies)]);
        let err = extract_complete(summary(), LOCATION, &body).unwrap_err();
        assert!(matches!(err, ScrapeError::UnknownResponseKind { kind, .. } if kind == "Carrier Pigeon from"));
    }

    #[test]
    fn test_kind_labels_case_insensitive() {
        let replies = [
            entry("reply", "D", "January 7, 2024 @ 10:00 AM", "x"),
            entry("INTERNAL REPLY", "C", "January 6, 2024 @ 10:00 AM", "x"),
            entry("Comment", "B", "January 5, 2024 @ 02:30 PM", "x"),
        ];
        let body = page(&[ORIGIN_BLOCK, &thread(&replies)]);

        let ticket = extract_complete(summary(), LOCATION, &body).unwrap();

        let kinds: Vec<ResponseKind> = ticket.responses.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ResponseKind::InternalComment,
                ResponseKind::InternalReply,
                ResponseKind::ExternalReply
            ]
        );
    }

    #[test]
    fn test_out_of_order_thread() {
        let replies = [
            entry("Reply", "Bob", "January 4, 2024 @ 09:00 AM", "Before the ticket existed."),
        ];
        let body = page(&[ORIGIN_BLOCK, &thread(&replies)]);
        let err = extract_complete(summary(), LOCATION, &body).unwrap_err();
        assert!(matches!(err, ScrapeError::OutOfOrder { index: 0, .. }));
    }

    #[test]
    fn test_short_thread_entry() {
        let replies = ["<li><h4>Reply from</h4><b>Bob</b></li>".to_string()];
        let body = page(&[ORIGIN_BLOCK, &thread(&replies)]);
        let err = extract_complete(summary(), LOCATION, &body).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingField { field: "timestamp", found: 2, .. }));
    }
}
