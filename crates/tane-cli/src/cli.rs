//! Command-line interface definition using clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tane_core::{default_cookie_file, expand_path};
use tane_models::DetailLevel;
use tane_runtime::WatchConfig;
use tane_session::SiteConfig;

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// tane - watch a Noctane ticket queue and raise desktop notifications
#[derive(Parser, Debug)]
#[command(name = "tane")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Noctane user name (prompted if absent)
    #[arg(short, long, env = tane_core::USER_ENV)]
    pub user: Option<String>,

    /// Notifications expire after N seconds
    #[arg(short, long = "expire-time", value_name = "N", default_value_t = 10)]
    pub expire_time: u64,

    /// Check for tickets every N seconds
    #[arg(
        short = 'i',
        long = "check-interval",
        value_name = "N",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub check_interval: u64,

    /// Minimum seconds between "new tickets" notifications
    #[arg(long, value_name = "N", default_value_t = 60)]
    pub new_interval: u64,

    /// Minimum seconds between "old tickets" notifications
    #[arg(long, value_name = "N", default_value_t = 600)]
    pub old_interval: u64,

    /// Fetch ticket details (-d: new tickets, -dd: all tickets)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub detail: u8,

    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Cookie store file; loaded if present, written after a fresh login.
    /// Without FILE, `cookies.json` in the state directory is used.
    #[arg(short, long = "cookie-file", value_name = "FILE", num_args = 0..=1)]
    pub cookie_file: Option<Option<PathBuf>>,

    /// Log notifications instead of showing desktop popups
    #[arg(long)]
    pub no_desktop: bool,

    /// Poll once, print the tickets and exit
    #[arg(long)]
    pub once: bool,

    /// Print the single poll as JSON
    #[arg(long, requires = "once")]
    pub json: bool,

    /// Noctane base URL
    #[arg(long, env = tane_core::BASE_URL_ENV, value_name = "URL")]
    pub base_url: Option<String>,
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    pub fn detail_level(&self) -> DetailLevel {
        DetailLevel::from_count(self.detail)
    }

    /// Cookie file with `~` and variables expanded.
    pub fn cookie_path(&self) -> Option<PathBuf> {
        match &self.cookie_file {
            Some(Some(path)) => Some(expand_path(path)),
            Some(None) => Some(default_cookie_file()),
            None => None,
        }
    }

    pub fn site(&self) -> SiteConfig {
        match &self.base_url {
            Some(base_url) => SiteConfig::new().with_base_url(base_url.as_str()),
            None => SiteConfig::new(),
        }
    }

    pub fn watch_config(&self) -> WatchConfig {
        WatchConfig::new()
            .with_poll_interval(Duration::from_secs(self.check_interval))
            .with_new_interval(Duration::from_secs(self.new_interval))
            .with_old_interval(Duration::from_secs(self.old_interval))
            .with_detail_level(self.detail_level())
    }

    pub fn expire(&self) -> Duration {
        Duration::from_secs(self.expire_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["tane"]);

        assert_eq!(cli.check_interval, 60);
        assert_eq!(cli.expire_time, 10);
        assert_eq!(cli.detail_level(), DetailLevel::Summary);
        assert_eq!(cli.log_level(), tracing::Level::WARN);
        assert!(!cli.once);
        assert!(cli.cookie_path().is_none());

        let config = cli.watch_config();
        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.new_interval, Duration::from_secs(60));
        assert_eq!(config.old_interval, Duration::from_secs(600));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "tane", "-u", "alice", "-i", "120", "-e", "5", "-dd", "-c", "/tmp/cookies.json",
        ]);

        assert_eq!(cli.user.as_deref(), Some("alice"));
        assert_eq!(cli.check_interval, 120);
        assert_eq!(cli.expire(), Duration::from_secs(5));
        assert_eq!(cli.detail_level(), DetailLevel::All);
        assert_eq!(cli.cookie_path(), Some(PathBuf::from("/tmp/cookies.json")));
    }

    #[test]
    fn test_cli_cookie_file_without_value() {
        let cli = Cli::parse_from(["tane", "-c"]);
        assert_eq!(cli.cookie_path(), Some(default_cookie_file()));
    }

    #[test]
    fn test_cli_detail_saturates() {
        let cli = Cli::parse_from(["tane", "-ddd"]);
        assert_eq!(cli.detail, 3);
        assert_eq!(cli.detail_level(), DetailLevel::All);
    }

    #[test]
    fn test_cli_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["tane", "-i", "0"]).is_err());
        assert!(Cli::try_parse_from(["tane", "-i", "-5"]).is_err());
    }

    #[test]
    fn test_cli_json_requires_once() {
        assert!(Cli::try_parse_from(["tane", "--json"]).is_err());
        let cli = Cli::parse_from(["tane", "--once", "--json"]);
        assert!(cli.once && cli.json);
    }

    #[test]
    fn test_cli_base_url() {
        let cli = Cli::parse_from(["tane", "--base-url", "https://noctane.test"]);
        assert_eq!(cli.site().listing_url(), "https://noctane.test/noc/tickets/mine");
    }

    #[test]
    fn test_cli_verbose() {
        let cli = Cli::parse_from(["tane", "-vvv"]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.log_level(), tracing::Level::TRACE);
    }

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }
}
