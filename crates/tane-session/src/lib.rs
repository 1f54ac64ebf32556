//! Remote session handling for tane.
//!
//! This crate owns everything that talks to the ticket site:
//! - [`SessionClient`] - browser-like handle (HTTP; in-memory with the `test-util` feature)
//! - [`SessionManager`] - login with bounded retry, listing page validation
//! - [`Session`] - the client plus its authentication state
//! - [`NavigationOutcome`] - where a listing navigation landed
//!
//! # Example
//!
//! ```no_run
//! use tane_session::{HttpClient, NavigationOutcome, SessionManager, SiteConfig, TerminalPrompt};
//!
//! let manager = SessionManager::new(SiteConfig::default());
//! let client = HttpClient::new().unwrap();
//! let mut prompt = TerminalPrompt::new(Some("alice@example.com".to_string()));
//! let mut session = manager.login(Box::new(client), &mut prompt).unwrap();
//!
//! match manager.ensure_loaded(&mut session).unwrap() {
//!     NavigationOutcome::Loaded(page) => println!("{} bytes of tickets", page.body.len()),
//!     NavigationOutcome::RedirectedToSignIn { .. } => println!("session expired"),
//!     NavigationOutcome::UnexpectedPage(location) => println!("landed on {}", location),
//! }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod form;
pub mod http;
pub mod manager;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod session;
pub mod site;

pub use client::{extract_title, Page, SessionClient};
pub use credentials::{CredentialSource, Credentials, StaticCredentials, TerminalPrompt};
pub use error::{Result, SessionError};
pub use form::{FormMethod, HtmlForm};
pub use http::HttpClient;
pub use manager::{SessionManager, DEFAULT_LOGIN_ATTEMPTS};
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryClient;
pub use session::{NavigationOutcome, Session};
pub use site::{SiteConfig, DEFAULT_BASE_URL};
