//! Login state machine and page validation.

use tracing::{debug, info, warn};

use crate::client::{Page, SessionClient};
use crate::credentials::CredentialSource;
use crate::session::{NavigationOutcome, Session};
use crate::site::SiteConfig;
use crate::{Result, SessionError};

/// Default number of login attempts before giving up.
pub const DEFAULT_LOGIN_ATTEMPTS: u32 = 3;

/// Turns credentials into an authenticated [`Session`] and checks it stays valid.
#[derive(Debug, Clone)]
pub struct SessionManager {
    site: SiteConfig,
    max_attempts: u32,
}

impl SessionManager {
    /// Creates a manager for the given site.
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            max_attempts: DEFAULT_LOGIN_ATTEMPTS,
        }
    }

    /// Sets the number of login attempts.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// The site layout this manager checks against.
    pub fn site(&self) -> &SiteConfig {
        &self.site
    }

    /// Sign in, retrying rejected credentials up to the attempt limit.
    ///
    /// # Errors
    ///
    /// - [`SessionError::WrongPage`] when the sign-in page itself does not
    ///   load; this is not retried.
    /// - [`SessionError::SessionFailure`] after every attempt was rejected.
    pub fn login(
        &self,
        mut client: Box<dyn SessionClient>,
        credentials: &mut dyn CredentialSource,
    ) -> Result<Session> {
        let sign_in = self.site.sign_in_url();
        let mut last_title = String::new();

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                warn!(attempt, max = self.max_attempts, "invalid credentials, retrying");
            }
            let creds = credentials.credentials(attempt)?;

            let page = client.open(&sign_in)?;
            if page.title() != self.site.login_title {
                return Err(SessionError::WrongPage {
                    page: page.identity().to_string(),
                });
            }

            let page = client.submit_form(
                0,
                &[
                    (self.site.email_field.as_str(), creds.username.as_str()),
                    (self.site.password_field.as_str(), creds.password.as_str()),
                ],
            )?;

            if self.site.is_landing(&page.location) {
                info!(user = %creds.username, attempt, "signed in");
                let location = page.location.clone();
                return Ok(Session::new(client, true, Some(location)));
            }

            debug!(
                attempt,
                location = %page.location,
                title = %page.title(),
                "login rejected"
            );
            last_title = page.title().to_string();
        }

        Err(SessionError::SessionFailure { last_title })
    }

    /// Wrap a client (typically carrying restored cookies) as an unverified session.
    ///
    /// Call [`SessionManager::ensure_loaded`] to find out whether it is signed in.
    pub fn restore(&self, client: Box<dyn SessionClient>) -> Session {
        Session::new(client, false, None)
    }

    /// Navigate to the listing page and report where we landed.
    ///
    /// # Errors
    /// Only transport failures are errors; page mismatches are outcomes.
    pub fn ensure_loaded(&self, session: &mut Session) -> Result<NavigationOutcome> {
        let listing = self.site.listing_url();
        let page = session.client_mut().open(&listing)?.clone();

        if page.title() == self.site.listing_title {
            debug!(location = %page.location, "listing page loaded");
            session.mark_valid(page.location.clone());
            Ok(NavigationOutcome::Loaded(page))
        } else if self.site.is_sign_in(&page.location) {
            info!(location = %page.location, "redirected to sign-in");
            session.invalidate();
            Ok(NavigationOutcome::RedirectedToSignIn {
                location: page.location,
            })
        } else {
            warn!(
                location = %page.location,
                title = %page.title(),
                "unexpected page instead of listing"
            );
            Ok(NavigationOutcome::UnexpectedPage(page.location))
        }
    }

    /// Navigate to a site-relative path.
    ///
    /// Landing on the sign-in page marks the session unauthenticated; the
    /// caller decides what that means for the page it wanted.
    pub fn open(&self, session: &mut Session, path: &str) -> Result<Page> {
        let url = self.site.url(path);
        let page = session.client_mut().open(&url)?.clone();
        if self.site.is_sign_in(&page.location) {
            info!(requested = %url, "redirected to sign-in");
            session.invalidate();
        }
        Ok(page)
    }
}
