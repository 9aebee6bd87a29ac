//! Centralized validation functions for listforge configuration.
//!
//! Category and source names become path components (cache directories,
//! cache files and output file stems), so they are restricted to a safe
//! character set.

use anyhow::Result;

use crate::error::ListforgeError;

/// Validate a category, source, or aggregate name.
///
/// # Examples
/// ```
/// use listforge::validation::validate_name;
/// assert!(validate_name("category", "ads").is_ok());
/// assert!(validate_name("source", "adaway.hosts").is_ok());
/// assert!(validate_name("source", "../etc").is_err());
/// assert!(validate_name("source", "").is_err());
/// ```
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ListforgeError::Config(format!("{} name must not be empty", kind)).into());
    }
    if name == "." || name == ".." {
        return Err(ListforgeError::Config(format!("Invalid {} name '{}'", kind, name)).into());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_.".contains(c))
    {
        return Err(ListforgeError::Config(format!(
            "Invalid {} name '{}': use ASCII letters, digits, '-', '_' or '.'",
            kind, name
        ))
        .into());
    }
    Ok(())
}

/// Validate a source URL (HTTP or HTTPS only).
///
/// # Examples
/// ```
/// use listforge::validation::validate_url;
/// assert!(validate_url("https://adaway.org/hosts.txt").is_ok());
/// assert!(validate_url("ftp://example.com/list").is_err());
/// ```
pub fn validate_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ListforgeError::Config(format!(
            "Source URL must use http:// or https://: {}",
            url
        ))
        .into()),
    }
}
