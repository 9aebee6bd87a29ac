//! Config command implementation.

use anyhow::Result;

use crate::config::Config;

/// Print the commented default configuration
pub async fn run() -> Result<()> {
    print!("{}", Config::generate_default_yaml());
    Ok(())
}
