//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "listforge")]
#[command(author, version, about = "Categorized domain blocklist builder")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run (default: run)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Download every source, then build all output files
    Run,

    /// Download every source into the cache only
    Fetch,

    /// Build output files from the existing cache (no network)
    Build,

    /// Show how a single list line is normalized and filtered
    Check {
        /// Raw line, as it would appear in a hosts file or adblock list
        #[arg(allow_hyphen_values = true)]
        line: String,
    },

    /// Print the default configuration file
    Config,

    /// Show version
    Version,
}

impl Cli {
    /// The subcommand to execute, `run` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}
