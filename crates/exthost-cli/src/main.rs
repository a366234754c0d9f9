//! Extension host CLI
//!
//! Validates a directory of extension manifests by running them through the
//! host lifecycle.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)
        .map_err(|e| CliError::user(format!("Failed to initialize logging: {e}")))?;
    tracing::debug!(verbose = cli.verbose, "Logging initialized");

    match cli.command {
        Some(Commands::Check { dir, disable }) => commands::run_check(&dir, disable),
        Some(Commands::List { dir }) => commands::run_list(&dir),
        None => {
            println!("{} Extension host CLI", "exthost".green().bold());
            println!();
            println!("Run {} for available commands.", "exthost --help".cyan());
            Ok(())
        }
    }
}
