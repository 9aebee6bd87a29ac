//! Run command implementation: fetch, then build.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::commands::build::{build_outputs, print_summary};
use crate::commands::fetch::fetch_sources;
use crate::config::Config;

/// Run the full pipeline
pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    // Every download finishes before any conversion starts
    fetch_sources(&config).await?;

    info!("Building rule lists...");
    let summary = build_outputs(&config)?;
    print_summary(&summary, &config.aggregate_name);

    Ok(())
}
