//! Fetch command implementation.

use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use crate::config::Config;
use crate::fetcher::Fetcher;
use crate::utils::{format_bytes, format_count};

/// Tally of one download round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Sources saved with a `200 OK` response
    pub downloaded: usize,
    /// Sources saved although the server answered with another status
    pub non_success: usize,
    /// Sources that failed on every attempt
    pub failed: usize,
    pub bytes: usize,
}

/// Download every configured source into the cache.
///
/// Individual failures are logged and counted, never returned as errors.
pub async fn fetch_sources(config: &Config) -> Result<FetchOutcome> {
    let jobs = config.download_jobs();
    info!(
        "Fetching {} sources in {} categories...",
        format_count(config.source_count()),
        config.categories.len()
    );

    let fetcher = Fetcher::new(&config.fetch)?;
    let results = fetcher.download_all(&jobs).await;

    let mut outcome = FetchOutcome::default();
    for result in results {
        match result {
            Ok(report) => {
                outcome.bytes += report.bytes;
                if report.is_success() {
                    outcome.downloaded += 1;
                } else {
                    outcome.non_success += 1;
                }
            }
            Err(e) => {
                warn!("Skipping source: {}", e);
                outcome.failed += 1;
            }
        }
    }

    info!(
        "Fetched {}/{} sources ({}), {} with non-200 status, {} failed",
        outcome.downloaded + outcome.non_success,
        jobs.len(),
        format_bytes(outcome.bytes as u64),
        outcome.non_success,
        outcome.failed
    );

    Ok(outcome)
}

/// Run the fetch command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let outcome = fetch_sources(&config).await?;

    println!();
    println!(
        "[OK] {} sources cached in {:?} ({} failed)",
        outcome.downloaded + outcome.non_success,
        config.cache_dir,
        outcome.failed
    );

    Ok(())
}
