//! listforge - Categorized Domain Blocklist Builder
//!
//! Fetches blocklists and writes canonical, AdGuard and Pi-hole rule files.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use listforge::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command() {
        Commands::Run => listforge::commands::run::run(&cli.config).await,
        Commands::Fetch => listforge::commands::fetch::run(&cli.config).await,
        Commands::Build => listforge::commands::build::run(&cli.config).await,
        Commands::Check { line } => listforge::commands::check::run(&line, &cli.config).await,
        Commands::Config => listforge::commands::config::run().await,
        Commands::Version => {
            println!("listforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
