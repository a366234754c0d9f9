//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Extension host - validate extension manifests and their dependencies
#[derive(Parser, Debug)]
#[command(name = "exthost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Construct, load and enable every extension in a directory
    ///
    /// Manifests are `*.toml` files directly in DIR and `extension.toml`
    /// files in its immediate subdirectories. Exits with status 1 if any
    /// extension fails to enable.
    Check {
        /// Directory holding the extensions
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Disable every enabled extension afterwards
        #[arg(long)]
        disable: bool,
    },

    /// List extension manifests and their dependencies
    List {
        /// Directory holding the extensions
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}
