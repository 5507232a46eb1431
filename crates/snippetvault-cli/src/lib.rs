pub mod cli;
pub mod commands;
pub mod utils;

use clap::Parser;
use cli::SnippetVault;
use commands::handle_command;
use snippetvault_core::{load_settings, Result, SnippetStore};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stderr keeps exported text on stdout clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: SnippetVault) -> Result<()> {
    let settings = load_settings()?;
    let store = Arc::new(SnippetStore::open_default()?);
    tracing::debug!(store = %store.path().display(), "opened snippet store");
    handle_command(store, &settings, args.commands)
}

/// Run the snippetvault CLI application
pub fn run_main() {
    let args = SnippetVault::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
