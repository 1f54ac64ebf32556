//! Session client abstraction.
//!
//! A [`SessionClient`] is a stateful browser-like handle: it navigates,
//! submits forms and remembers the page it is on. The session manager and
//! the extractors only ever see this trait.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::Result;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("Invalid title selector"));

/// A fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Final location after redirects.
    pub location: String,
    /// Document title, trimmed; `None` when the page has no `<title>`.
    pub title: Option<String>,
    /// Raw response body.
    pub body: String,
}

impl Page {
    /// Builds a page, extracting the title from the body.
    pub fn new(location: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            location: location.into(),
            title: extract_title(&body),
            body,
        }
    }

    /// Title or empty string.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Title when present, otherwise the location.
    pub fn identity(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.location)
    }
}

/// Extract the trimmed text of the first `<title>` element.
pub fn extract_title(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let title = document.select(&TITLE_SELECTOR).next()?;
    let text = title.text().collect::<String>();
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Browser-like handle used to talk to the remote site.
pub trait SessionClient {
    /// Navigate to an absolute location, following redirects.
    fn open(&mut self, location: &str) -> Result<&Page>;

    /// Submit the `index`-th form of the current page.
    ///
    /// Pre-filled inputs are kept; `fields` override or add values.
    fn submit_form(&mut self, index: usize, fields: &[(&str, &str)]) -> Result<&Page>;

    /// The page loaded by the last navigation, if any.
    fn page(&self) -> Option<&Page>;
}
