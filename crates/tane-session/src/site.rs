//! Remote site layout.

use url::Url;

/// Default site root.
pub const DEFAULT_BASE_URL: &str = "https://noctane.contegix.com";

/// Locations, page titles and form fields of the remote ticket system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Site root without a trailing slash.
    pub base_url: String,
    /// Path of the sign-in page.
    pub sign_in_path: String,
    /// Path of the "my tickets" listing.
    pub listing_path: String,
    /// Prefix joined with a ticket number to form its detail path.
    pub ticket_path_prefix: String,
    /// Expected title of the sign-in page.
    pub login_title: String,
    /// Expected title of the listing page.
    pub listing_title: String,
    /// Paths that count as "signed in" after submitting credentials.
    pub landing_paths: Vec<String>,
    /// Form field carrying the user name.
    pub email_field: String,
    /// Form field carrying the password.
    pub password_field: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            sign_in_path: "/sign_in".to_string(),
            listing_path: "/noc/tickets/mine".to_string(),
            ticket_path_prefix: "/noc/tickets/".to_string(),
            login_title: "Noctane Login".to_string(),
            listing_title: "Tickets Assigned to Me \u{2013} Noctane".to_string(),
            landing_paths: vec!["/dashboard".to_string(), "/noc/tickets/mine".to_string()],
            email_field: "session[email]".to_string(),
            password_field: "session[password]".to_string(),
        }
    }
}

impl SiteConfig {
    /// Creates the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the site root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Absolute URL of a site-relative path.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Absolute URL of the sign-in page.
    pub fn sign_in_url(&self) -> String {
        self.url(&self.sign_in_path)
    }

    /// Absolute URL of the listing page.
    pub fn listing_url(&self) -> String {
        self.url(&self.listing_path)
    }

    /// Site-relative detail path of a ticket.
    pub fn ticket_path(&self, ticket_number: &str) -> String {
        format!("{}{}", self.ticket_path_prefix, ticket_number)
    }

    /// Whether `location` is the sign-in page.
    pub fn is_sign_in(&self, location: &str) -> bool {
        self.same_page(location, &self.sign_in_path)
    }

    /// Whether `location` is one of the authenticated landing pages.
    pub fn is_landing(&self, location: &str) -> bool {
        self.landing_paths
            .iter()
            .any(|path| self.same_page(location, path))
    }

    /// Compares origin and path, ignoring query, fragment and a trailing slash.
    fn same_page(&self, location: &str, path: &str) -> bool {
        let (Ok(actual), Ok(expected)) = (Url::parse(location), Url::parse(&self.url(path)))
        else {
            return false;
        };
        actual.origin() == expected.origin()
            && actual.path().trim_end_matches('/') == expected.path().trim_end_matches('/')
    }
}
