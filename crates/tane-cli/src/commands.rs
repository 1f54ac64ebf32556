//! Startup, the watch loop and the single-poll mode.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use reqwest_cookie_store::{CookieStore, CookieStoreMutex};
use tane_core::PASSWORD_ENV;
use tane_models::{Collection, DetailLevel};
use tane_persistence::{load_cookie_store, save_cookie_store, CookieLoad};
use tane_runtime::{
    collect, register_shutdown_signals, DesktopNotifier, Exit, LogNotifier, Notifier,
    RuntimeError, Scheduler, SystemTimeSource, EXPIRED_MESSAGE,
};
use tane_session::{
    CredentialSource, HttpClient, NavigationOutcome, Session, SessionClient, SessionManager,
    TerminalPrompt,
};
use tracing::{debug, info, warn};

use crate::cli::Cli;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Printed when the operator stops the watch loop.
pub const EXIT_MESSAGE: &str = "Exiting on user command";

const TICKET_SEPARATOR: &str = "==========";

/// How a run ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// The single poll finished.
    Completed,
    /// The operator asked to stop.
    Stopped,
}

/// Run the command line as parsed.
pub fn execute(cli: &Cli) -> Result<()> {
    let shutdown = register_shutdown_signals()?;
    let config = cli.watch_config();
    config.validate()?;
    if config.is_long_poll() {
        warn!(
            interval_secs = cli.check_interval,
            "check interval will allow overdue tickets to accumulate"
        );
    }

    let manager = SessionManager::new(cli.site());
    let cookie_path = cli.cookie_path();

    let store = match &cookie_path {
        Some(path) => match load_cookie_store(path)? {
            CookieLoad::Loaded(store) => store,
            CookieLoad::Absent => {
                info!(path = %path.display(), "no saved cookies");
                CookieStore::default()
            }
        },
        None => CookieStore::default(),
    };
    let mut cookies = Arc::new(CookieStoreMutex::new(store));
    let restored = HttpClient::with_cookie_store(Arc::clone(&cookies))?;

    let mut prompt =
        TerminalPrompt::new(cli.user.clone()).with_initial_password(std::env::var(PASSWORD_ENV).ok());

    let (session, fresh_login) = start_session(&manager, Box::new(restored), &mut prompt, || {
        if cookie_path.is_some() {
            println!("Your cookie was invalid or new. Opening a new session.");
        }
        cookies = Arc::new(CookieStoreMutex::default());
        let client: Box<dyn SessionClient> =
            Box::new(HttpClient::with_cookie_store(Arc::clone(&cookies))?);
        Ok(client)
    })?;

    let result = run(cli, manager, session, shutdown);

    let saved = match (&cookie_path, fresh_login) {
        (Some(path), true) => save_cookies(path, &cookies),
        _ => Ok(()),
    };
    let finish = result?;
    saved?;
    if finish == Finish::Stopped {
        println!("\n\n{}\n", EXIT_MESSAGE);
    }
    Ok(())
}

/// Poll once or watch, unless shutdown was already requested during startup.
pub fn run(
    cli: &Cli,
    manager: SessionManager,
    session: Session,
    shutdown: Arc<AtomicBool>,
) -> Result<Finish> {
    if shutdown.load(Ordering::SeqCst) {
        info!("shutdown requested during startup");
        return Ok(Finish::Stopped);
    }
    if cli.once {
        poll_once(&manager, session, cli.detail_level(), cli.json)?;
        return Ok(if shutdown.load(Ordering::SeqCst) {
            Finish::Stopped
        } else {
            Finish::Completed
        });
    }
    watch(cli, manager, session, shutdown)
}

/// Check the restored session and log in when it is not valid.
///
/// Returns the session and whether a fresh login was needed. `fresh_client`
/// supplies the client for the login, so stale cookies do not leak into the
/// new session.
pub fn start_session<F>(
    manager: &SessionManager,
    restored: Box<dyn SessionClient>,
    credentials: &mut dyn CredentialSource,
    fresh_client: F,
) -> Result<(Session, bool)>
where
    F: FnOnce() -> Result<Box<dyn SessionClient>>,
{
    let mut session = manager.restore(restored);
    match manager.ensure_loaded(&mut session)? {
        NavigationOutcome::Loaded(_) => {
            info!("restored session is valid");
            Ok((session, false))
        }
        NavigationOutcome::RedirectedToSignIn { .. } => {
            debug!("restored session rejected, logging in");
            let session = manager.login(fresh_client()?, credentials)?;
            Ok((session, true))
        }
        NavigationOutcome::UnexpectedPage(location) => {
            Err(RuntimeError::UnexpectedPage(location).into())
        }
    }
}

fn poll_once(
    manager: &SessionManager,
    mut session: Session,
    detail_level: DetailLevel,
    json: bool,
) -> Result<()> {
    manager.ensure_loaded(&mut session)?.into_page()?;
    let collection = collect(manager, &mut session, detail_level)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&collection)?);
    } else {
        print!("{}", render_collection(&collection));
    }
    Ok(())
}

fn watch(
    cli: &Cli,
    manager: SessionManager,
    session: Session,
    shutdown: Arc<AtomicBool>,
) -> Result<Finish> {
    let time = SystemTimeSource::with_shutdown_flag(shutdown);
    let notifier: Box<dyn Notifier> = if cli.no_desktop {
        Box::new(LogNotifier)
    } else {
        Box::new(DesktopNotifier::new(cli.expire()))
    };

    let mut scheduler = Scheduler::new(
        manager,
        session,
        cli.watch_config(),
        Box::new(time),
        notifier,
    );

    match scheduler.run()? {
        Exit::Interrupted => Ok(Finish::Stopped),
        Exit::Expired => Err(EXPIRED_MESSAGE.into()),
    }
}

fn save_cookies(path: &Path, cookies: &CookieStoreMutex) -> Result<()> {
    let store = cookies
        .lock()
        .map_err(|_| "cookie store lock poisoned")?;
    save_cookie_store(path, &store)?;
    println!("Saved cookies to {}", path.display());
    Ok(())
}

/// Text form of one poll: new tickets first, then old ones.
pub fn render_collection(collection: &Collection) -> String {
    let mut out = String::new();
    for (heading, tickets) in [
        ("New tickets", &collection.new_tickets),
        ("Old tickets", &collection.tickets),
    ] {
        out.push_str(&format!("{} ({})\n", heading, tickets.len()));
        for ticket in tickets {
            out.push_str(&format!("{}\n{}\n", ticket, TICKET_SEPARATOR));
        }
    }
    out
}
