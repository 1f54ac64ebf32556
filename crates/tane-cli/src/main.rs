//! tane entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use tane_cli::cli::Cli;
use tane_cli::commands;

fn main() {
    // .env.local may carry TANE_USER, TANE_PASSWORD and TANE_BASE_URL
    tane_core::load_env();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    if let Err(e) = commands::execute(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
