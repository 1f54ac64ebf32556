//! In-memory session client.
//!
//! Serves canned pages from a shared site map so the session manager,
//! extractors and scheduler can run without a network. Clones share the same
//! site, so a test can keep one handle to change pages or inspect visits
//! while another is owned by the session.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::client::{Page, SessionClient};
use crate::form::HtmlForm;
use crate::{Result, SessionError};

/// Maximum redirects followed per navigation.
const MAX_REDIRECTS: usize = 10;

const NOT_FOUND_BODY: &str = "<html><head><title>Not Found</title></head><body></body></html>";

/// Decides where a form submission lands: `(form page location, submitted fields) -> location`.
pub type SubmitHandler = Box<dyn FnMut(&str, &[(String, String)]) -> String>;

#[derive(Default)]
struct SiteState {
    pages: HashMap<String, String>,
    redirects: HashMap<String, String>,
    on_submit: Option<SubmitHandler>,
    visits: Vec<String>,
    submissions: Vec<Vec<(String, String)>>,
}

/// A [`SessionClient`] over an in-memory site.
#[derive(Clone, Default)]
pub struct MemoryClient {
    site: Rc<RefCell<SiteState>>,
    page: Option<Page>,
}

impl MemoryClient {
    /// Creates a client over an empty site.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the page served at `location`.
    pub fn with_page(self, location: impl Into<String>, body: impl Into<String>) -> Self {
        self.set_page(location, body);
        self
    }

    /// Adds a redirect from one location to another.
    pub fn with_redirect(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.set_redirect(from, to);
        self
    }

    /// Sets the handler deciding where form submissions land.
    pub fn on_submit(
        self,
        handler: impl FnMut(&str, &[(String, String)]) -> String + 'static,
    ) -> Self {
        self.site.borrow_mut().on_submit = Some(Box::new(handler));
        self
    }

    /// Adds or replaces a page on the shared site.
    pub fn set_page(&self, location: impl Into<String>, body: impl Into<String>) {
        self.site
            .borrow_mut()
            .pages
            .insert(location.into(), body.into());
    }

    /// Adds or replaces a redirect on the shared site.
    pub fn set_redirect(&self, from: impl Into<String>, to: impl Into<String>) {
        self.site
            .borrow_mut()
            .redirects
            .insert(from.into(), to.into());
    }

    /// Removes a redirect from the shared site.
    pub fn clear_redirect(&self, from: &str) {
        self.site.borrow_mut().redirects.remove(from);
    }

    /// Every location requested so far, before redirects, across all clones.
    pub fn visits(&self) -> Vec<String> {
        self.site.borrow().visits.clone()
    }

    /// Every form submission so far, across all clones.
    pub fn submissions(&self) -> Vec<Vec<(String, String)>> {
        self.site.borrow().submissions.clone()
    }

    fn navigate(&mut self, location: &str) -> &Page {
        let page = {
            let mut site = self.site.borrow_mut();
            let mut current = location.to_string();
            for _ in 0..MAX_REDIRECTS {
                match site.redirects.get(&current) {
                    Some(next) => current = next.clone(),
                    None => break,
                }
            }
            let body = site
                .pages
                .get(&current)
                .cloned()
                .unwrap_or_else(|| NOT_FOUND_BODY.to_string());
            Page::new(current, body)
        };
        self.page.insert(page)
    }
}

impl SessionClient for MemoryClient {
    fn open(&mut self, location: &str) -> Result<&Page> {
        self.site.borrow_mut().visits.push(location.to_string());
        Ok(self.navigate(location))
    }

    fn submit_form(&mut self, index: usize, fields: &[(&str, &str)]) -> Result<&Page> {
        let page = self.page.as_ref().ok_or(SessionError::NoPage)?;
        let form = HtmlForm::parse(&page.body, index).ok_or_else(|| SessionError::FormNotFound {
            index,
            location: page.location.clone(),
        })?;
        let values = form.fill(fields);
        let from = page.location.clone();

        let handler = self.site.borrow_mut().on_submit.take();
        let target = match handler {
            Some(mut handler) => {
                let target = handler(&from, &values);
                self.site.borrow_mut().on_submit = Some(handler);
                target
            }
            None => from,
        };

        {
            let mut site = self.site.borrow_mut();
            site.submissions.push(values);
            site.visits.push(target.clone());
        }
        Ok(self.navigate(&target))
    }

    fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }
}
