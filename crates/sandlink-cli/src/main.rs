//! SandLink CLI - terminal host for SandLink lighting-control devices.
//!
//! Hosts a SandNet-style device from the terminal: run it with its periodic
//! presence advertisement, fire one-shot advertisements, and manage the
//! device preferences store.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let prefs_dir = commands::resolve_prefs_dir(cli.prefs_dir)?;

    match cli.command {
        Commands::Run(args) => commands::run_device(args, prefs_dir, cli.json).await,
        Commands::Advertise(args) => commands::run_advertise(args, prefs_dir, cli.json).await,
        Commands::Prefs(args) => commands::run_prefs(args, prefs_dir, cli.json),
    }
}
