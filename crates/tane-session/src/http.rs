//! HTTP session client backed by reqwest.

use std::sync::Arc;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest_cookie_store::CookieStoreMutex;
use tracing::{debug, trace};
use url::Url;

use crate::client::{Page, SessionClient};
use crate::form::{FormMethod, HtmlForm};
use crate::{Result, SessionError};

const USER_AGENT: &str = concat!(
    "Mozilla/5.0 (X11; Linux x86_64) tane/",
    env!("CARGO_PKG_VERSION")
);

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Browser-like client: follows redirects, keeps cookies, submits forms.
pub struct HttpClient {
    client: Client,
    cookies: Arc<CookieStoreMutex>,
    page: Option<Page>,
}

impl HttpClient {
    /// Creates a client with an empty cookie store.
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        Self::with_cookie_store(Arc::new(CookieStoreMutex::default()))
    }

    /// Creates a client sharing the given cookie store.
    ///
    /// The caller keeps its `Arc` to persist cookies after the session ends.
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn with_cookie_store(cookies: Arc<CookieStoreMutex>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_provider(Arc::clone(&cookies))
            .build()?;

        Ok(Self {
            client,
            cookies,
            page: None,
        })
    }

    /// The cookie store shared with the underlying client.
    pub fn cookie_store(&self) -> Arc<CookieStoreMutex> {
        Arc::clone(&self.cookies)
    }

    fn load(&mut self, request: RequestBuilder) -> Result<&Page> {
        let response = request.send()?;
        let status = response.status();
        let location = response.url().to_string();
        let body = response.text()?;
        trace!(%status, location = %location, bytes = body.len(), "page loaded");
        let page: &Page = self.page.insert(Page::new(location, body));
        Ok(page)
    }
}

impl SessionClient for HttpClient {
    fn open(&mut self, location: &str) -> Result<&Page> {
        debug!(location = %location, "opening page");
        let request = self.client.get(location);
        self.load(request)
    }

    fn submit_form(&mut self, index: usize, fields: &[(&str, &str)]) -> Result<&Page> {
        let page = self.page.as_ref().ok_or(SessionError::NoPage)?;
        let form = HtmlForm::parse(&page.body, index).ok_or_else(|| SessionError::FormNotFound {
            index,
            location: page.location.clone(),
        })?;

        let action = Url::parse(&page.location)?.join(&form.action)?;
        let values = form.fill(fields);
        debug!(action = %action, method = ?form.method, "submitting form");

        let request = match form.method {
            FormMethod::Get => self.client.get(action).query(&values),
            FormMethod::Post => self.client.post(action).form(&values),
        };
        self.load(request)
    }

    fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }
}
