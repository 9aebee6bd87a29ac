//! Error types for listforge.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListforgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Failed after {attempts} attempts for {url}: {reason}")]
    Exhausted {
        url: String,
        attempts: u32,
        reason: String,
    },
}
