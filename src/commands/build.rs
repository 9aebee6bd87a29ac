//! Build command implementation.

use anyhow::Result;
use std::path::Path;
use tracing::warn;

use crate::aggregator::{BuildSummary, Builder};
use crate::allowlist::Allowlist;
use crate::config::Config;
use crate::fs_abstraction::real_fs;
use crate::utils::format_count;

/// Convert every cached source and write all output files
pub fn build_outputs(config: &Config) -> Result<BuildSummary> {
    let allowlist = Allowlist::load(real_fs(), &config.allowlist)?;
    let builder = Builder::from_config(real_fs(), config, &allowlist);
    let summary = builder.build_all(&config.categories)?;

    let missing: usize = summary.categories.iter().map(|c| c.missing).sum();
    if missing > 0 {
        warn!("{} cached sources were missing and contributed no rules", missing);
    }

    Ok(summary)
}

/// Print per-category counts
pub fn print_summary(summary: &BuildSummary, aggregate_name: &str) {
    println!();
    for category in &summary.categories {
        println!(
            "  {:<20} {:>10} rules {:>10} pihole{}",
            category.name,
            format_count(category.rules),
            format_count(category.restricted),
            if category.missing > 0 {
                format!("  ({} missing)", category.missing)
            } else {
                String::new()
            }
        );
    }
    println!(
        "[OK] {}: {} rules, {} pihole entries",
        aggregate_name,
        format_count(summary.total_rules),
        format_count(summary.total_restricted)
    );
}

/// Run the build command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let summary = build_outputs(&config)?;
    print_summary(&summary, &config.aggregate_name);
    Ok(())
}
