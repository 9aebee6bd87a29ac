//! Check command implementation.

use anyhow::Result;
use std::path::Path;

use crate::allowlist::Allowlist;
use crate::config::Config;
use crate::fs_abstraction::real_fs;
use crate::rules::{bare_domain, is_valid_rule, normalize_line, skip_line, to_restricted};

/// How one raw line travels through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReport {
    pub normalized: String,
    pub skipped: bool,
    /// Allowlist entry that exempted the line, if any
    pub allowlisted_by: Option<String>,
    pub valid: bool,
    /// Pi-hole form, if the rule has one and is kept
    pub restricted: Option<String>,
}

/// Trace a raw line through normalization, filtering and conversion
pub fn inspect_line(line: &str, allowlist: &Allowlist) -> LineReport {
    let normalized = normalize_line(line);
    let skipped = skip_line(&normalized, allowlist);
    let allowlisted_by = allowlist
        .matching_entry(&bare_domain(&normalized))
        .map(str::to_string);
    let valid = is_valid_rule(&normalized);
    let restricted = if skipped {
        None
    } else {
        to_restricted(std::slice::from_ref(&normalized)).pop()
    };

    LineReport {
        normalized,
        skipped,
        allowlisted_by,
        valid,
        restricted,
    }
}

/// Run the check command
pub async fn run(line: &str, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let allowlist = Allowlist::load(real_fs(), &config.allowlist)?;
    let report = inspect_line(line, &allowlist);

    println!();
    println!("Input:      {}", line);
    println!("Normalized: {}", report.normalized);
    if let Some(entry) = &report.allowlisted_by {
        println!("Result:     SKIPPED (allowlisted by {:?})", entry);
    } else if report.skipped {
        println!("Result:     SKIPPED (not in any output)");
    } else {
        println!("Result:     KEPT");
        println!(
            "Valid:      {}",
            if report.valid { "yes" } else { "no (kept anyway)" }
        );
        println!(
            "Pi-hole:    {}",
            report.restricted.as_deref().unwrap_or("(not representable)")
        );
    }
    println!();

    Ok(())
}
