//! Allowlist of substrings that exempt a rule from every output.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::fs_abstraction::{read_lossy, FileSystem};

/// Ordered list of substrings; a rule whose domain part contains any of
/// them is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    entries: Vec<String>,
}

impl Allowlist {
    /// Build an allowlist from explicit entries. Empty entries are ignored,
    /// since an empty substring would match every rule.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(Into::into)
                .filter(|e: &String| !e.is_empty())
                .collect(),
        }
    }

    /// Parse allowlist file content: one substring per line.
    pub fn parse(content: &str) -> Self {
        Self::new(content.lines())
    }

    /// Load the allowlist file. A missing file yields an empty allowlist.
    pub fn load<F: FileSystem + ?Sized>(fs: &F, path: &Path) -> Result<Self> {
        match read_lossy(fs, path) {
            Ok(content) => {
                let allowlist = Self::parse(&content);
                if allowlist.is_empty() {
                    warn!("Allowlist {:?} has no entries", path);
                } else {
                    info!("Allowlist: {} entries from {:?}", allowlist.len(), path);
                }
                Ok(allowlist)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Allowlist {:?} not found, nothing will be exempted", path);
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read allowlist: {:?}", path)),
        }
    }

    /// True when any entry occurs in `text`
    pub fn matches(&self, text: &str) -> bool {
        self.matching_entry(text).is_some()
    }

    /// First entry, in file order, that occurs in `text`
    pub fn matching_entry(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .map(String::as_str)
            .find(|entry| text.contains(entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
