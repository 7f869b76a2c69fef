//! `tabaudit-cli`: inventory administration from the terminal.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tabaudit_core::error::ErrorKind;

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        output::print_error(&format!("[{}] {}", e.kind, e.message));
        // Refusals by a business rule or bad input exit 2; everything else 1.
        let code = match e.kind {
            ErrorKind::Rule(_) | ErrorKind::Validation | ErrorKind::NotFound => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}
