//! Cookie store persistence.
//!
//! The cookie store is kept as JSON in the `cookie_store` format. Session
//! cookies without an expiry are saved too, since the remote site's login
//! cookie is usually one of them.

use std::fs;
use std::io::{BufReader, Cursor};
use std::path::Path;

use cookie_store::CookieStore;
use tracing::debug;

use crate::atomic::{atomic_write, touch};
use crate::error::{PersistenceError, Result};

/// Outcome of loading a cookie store from disk.
#[derive(Debug)]
pub enum CookieLoad {
    /// A store was read successfully.
    Loaded(CookieStore),
    /// No usable store yet: the file was missing (now created empty) or empty.
    Absent,
}

impl CookieLoad {
    /// Whether a store was read from disk.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The loaded store, or an empty one.
    pub fn into_store(self) -> CookieStore {
        match self {
            Self::Loaded(store) => store,
            Self::Absent => CookieStore::default(),
        }
    }
}

/// Load a cookie store from `path`.
///
/// A missing file is created empty so an unwritable location is reported now
/// rather than at shutdown. An empty file counts as absent.
///
/// # Errors
/// Returns [`PersistenceError::InvalidData`] when the file holds something
/// other than a cookie store, or an I/O error when it cannot be read/created.
pub fn load_cookie_store(path: &Path) -> Result<CookieLoad> {
    if !path.exists() {
        debug!(path = %path.display(), "cookie store missing, creating empty file");
        touch(path)?;
        return Ok(CookieLoad::Absent);
    }

    let data = fs::read(path).map_err(|source| PersistenceError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    if data.iter().all(u8::is_ascii_whitespace) {
        debug!(path = %path.display(), "cookie store empty");
        return Ok(CookieLoad::Absent);
    }

    let store = cookie_store::serde::json::load(BufReader::new(Cursor::new(data))).map_err(
        |e| PersistenceError::InvalidData {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    )?;

    debug!(path = %path.display(), "cookie store loaded");
    Ok(CookieLoad::Loaded(store))
}

/// Save a cookie store to `path` atomically, including session cookies.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub fn save_cookie_store(path: &Path, store: &CookieStore) -> Result<()> {
    let mut buf = Vec::new();
    cookie_store::serde::json::save_incl_expired_and_nonpersistent(store, &mut buf)
        .map_err(|e| PersistenceError::SerializeError(e.to_string()))?;
    atomic_write(path, &buf)?;
    debug!(path = %path.display(), bytes = buf.len(), "cookie store saved");
    Ok(())
}
