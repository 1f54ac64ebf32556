//! Authenticated session value and navigation outcomes.

use std::fmt;

use crate::client::{Page, SessionClient};
use crate::{Result, SessionError};

/// A session client plus what the manager knows about its authentication.
///
/// Only [`crate::SessionManager`] mutates a session; everyone else reads it.
pub struct Session {
    client: Box<dyn SessionClient>,
    authenticated: bool,
    last_validated_location: Option<String>,
}

impl Session {
    pub(crate) fn new(
        client: Box<dyn SessionClient>,
        authenticated: bool,
        last_validated_location: Option<String>,
    ) -> Self {
        Self {
            client,
            authenticated,
            last_validated_location,
        }
    }

    /// Whether the last check found the session signed in.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Location of the last page that proved the session valid.
    pub fn last_validated_location(&self) -> Option<&str> {
        self.last_validated_location.as_deref()
    }

    /// The page loaded by the last navigation.
    pub fn page(&self) -> Option<&Page> {
        self.client.page()
    }

    pub(crate) fn client_mut(&mut self) -> &mut dyn SessionClient {
        self.client.as_mut()
    }

    pub(crate) fn mark_valid(&mut self, location: String) {
        self.authenticated = true;
        self.last_validated_location = Some(location);
    }

    pub(crate) fn invalidate(&mut self) {
        self.authenticated = false;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.authenticated)
            .field("last_validated_location", &self.last_validated_location)
            .field("page", &self.page().map(|p| p.location.as_str()))
            .finish()
    }
}

/// Where a navigation to the listing page ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The expected page loaded.
    Loaded(Page),
    /// The site sent us to the sign-in page: the session expired.
    RedirectedToSignIn { location: String },
    /// Some other page loaded; the extraction contract cannot be trusted.
    UnexpectedPage(String),
}

impl NavigationOutcome {
    /// The loaded page, or [`SessionError::WrongPage`] carrying the location.
    pub fn into_page(self) -> Result<Page> {
        match self {
            Self::Loaded(page) => Ok(page),
            Self::RedirectedToSignIn { location } => Err(SessionError::WrongPage { page: location }),
            Self::UnexpectedPage(location) => Err(SessionError::WrongPage { page: location }),
        }
    }

    /// Whether the outcome means the session expired.
    pub fn is_sign_in(&self) -> bool {
        matches!(self, Self::RedirectedToSignIn { .. })
    }
}
