//! Credential sources for the login flow.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, BufRead, Write};

use crate::Result;

/// A user name and password pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Supplies credentials for each login attempt (1-based).
pub trait CredentialSource {
    fn credentials(&mut self, attempt: u32) -> Result<Credentials>;
}

/// Prompts on the terminal.
///
/// The first attempt reuses the configured user name when one was given;
/// later attempts ask for both values again. Passwords are read without echo.
#[derive(Default)]
pub struct TerminalPrompt {
    username: Option<String>,
    initial_password: Option<String>,
}

impl TerminalPrompt {
    pub fn new(username: Option<String>) -> Self {
        Self {
            username,
            initial_password: None,
        }
    }

    /// Password used for the first attempt instead of prompting.
    pub fn with_initial_password(mut self, password: Option<String>) -> Self {
        self.initial_password = password;
        self
    }
}

impl CredentialSource for TerminalPrompt {
    fn credentials(&mut self, attempt: u32) -> Result<Credentials> {
        let username = match (&self.username, attempt) {
            (Some(user), 1) => user.clone(),
            _ => read_line("Noctane user name: ")?,
        };
        let password = match self.initial_password.take() {
            Some(password) if attempt == 1 => password,
            _ => rpassword::prompt_password("Noctane password: ")?,
        };
        Ok(Credentials { username, password })
    }
}

fn read_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no input"));
    }
    Ok(line.trim().to_string())
}

/// Hands out a fixed sequence of credentials, repeating the last one.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    queue: VecDeque<Credentials>,
    last: Option<Credentials>,
    requests: u32,
}

impl StaticCredentials {
    pub fn new(credentials: impl IntoIterator<Item = Credentials>) -> Self {
        Self {
            queue: credentials.into_iter().collect(),
            last: None,
            requests: 0,
        }
    }

    /// How many times credentials were requested.
    pub fn requests(&self) -> u32 {
        self.requests
    }
}

impl CredentialSource for StaticCredentials {
    fn credentials(&mut self, _attempt: u32) -> Result<Credentials> {
        self.requests += 1;
        if let Some(next) = self.queue.pop_front() {
            self.last = Some(next);
        }
        self.last.clone().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "no credentials configured").into()
        })
    }
}
