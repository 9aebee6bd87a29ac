//! Configuration management for listforge.
//!
//! The configuration holds the source registry (categories of remote lists,
//! in merge order), the working directories, the allowlist location and the
//! download settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ListforgeError;
use crate::fetcher::DownloadJob;
use crate::validation::{validate_name, validate_url};

/// Default configuration file path (relative to the working directory)
pub const DEFAULT_CONFIG_PATH: &str = "listforge.yaml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding downloaded lists (`<cache_dir>/<category>/<name>.txt`)
    pub cache_dir: PathBuf,

    /// Directory receiving the generated `.txt`, `.adguard` and `.pihole` files
    pub output_dir: PathBuf,

    /// Allowlist file, one substring per line
    pub allowlist: PathBuf,

    /// File stem of the aggregate output (`list.txt`, `list.adguard`, ...)
    pub aggregate_name: String,

    /// Download settings
    pub fetch: FetchSettings,

    /// Source registry; order determines merge order of the aggregate
    pub categories: Vec<Category>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            allowlist: PathBuf::from("allowlist.txt"),
            aggregate_name: "list".to_string(),
            fetch: FetchSettings::default(),
            categories: default_categories(),
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration, falling back to the built-in registry when the
    /// file does not exist. A file that exists but is invalid is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            info!(
                "No config file at {:?}, using built-in source registry",
                path.as_ref()
            );
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(ListforgeError::Config("No categories configured".to_string()).into());
        }

        validate_name("aggregate", &self.aggregate_name)?;

        let mut seen_categories = HashSet::new();
        for category in &self.categories {
            validate_name("category", &category.name)?;

            if !seen_categories.insert(category.name.as_str()) {
                return Err(ListforgeError::Config(format!(
                    "Duplicate category '{}'",
                    category.name
                ))
                .into());
            }

            if category.name == self.aggregate_name {
                return Err(ListforgeError::Config(format!(
                    "Category '{}' collides with aggregate_name",
                    category.name
                ))
                .into());
            }

            let mut seen_sources = HashSet::new();
            for source in &category.sources {
                validate_name("source", &source.name)?;
                validate_url(&source.url)
                    .with_context(|| format!("Invalid source '{}/{}'", category.name, source.name))?;

                if !seen_sources.insert(source.name.as_str()) {
                    return Err(ListforgeError::Config(format!(
                        "Duplicate source '{}' in category '{}'",
                        source.name, category.name
                    ))
                    .into());
                }
            }
        }

        self.fetch.validate()?;

        Ok(())
    }

    /// Cache file path for one source: `<cache_dir>/<category>/<name>.txt`
    pub fn cache_path(&self, category: &Category, source: &Source) -> PathBuf {
        cache_file_path(&self.cache_dir, &category.name, &source.name)
    }

    /// One download job per source, across all categories, in registry order
    pub fn download_jobs(&self) -> Vec<DownloadJob> {
        self.categories
            .iter()
            .flat_map(|category| {
                category.sources.iter().map(move |source| DownloadJob {
                    url: source.url.clone(),
                    path: self.cache_path(category, source),
                })
            })
            .collect()
    }

    /// Total number of sources across all categories
    pub fn source_count(&self) -> usize {
        self.categories.iter().map(|c| c.sources.len()).sum()
    }

    /// Generate default config with comments
    pub fn generate_default_yaml() -> String {
        include_str!("../templates/listforge.yaml").to_string()
    }
}

/// Where a source's downloaded text is kept
pub fn cache_file_path(cache_dir: &Path, category: &str, source: &str) -> PathBuf {
    cache_dir.join(category).join(format!("{}.txt", source))
}

/// A named group of sources, written to its own set of output files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// One remote list belonging to a category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchSettings {
    /// Attempts per source before giving up
    pub retries: u32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum downloads in flight
    pub workers: usize,

    /// Base delay between attempts, doubled after each failure (0 = none)
    pub retry_delay_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            retries: 3,
            timeout_secs: 15,
            workers: 16,
            retry_delay_ms: 0,
        }
    }
}

impl FetchSettings {
    pub fn validate(&self) -> Result<()> {
        if self.retries == 0 {
            return Err(ListforgeError::Config("fetch.retries must be at least 1".to_string()).into());
        }
        if self.timeout_secs == 0 {
            return Err(
                ListforgeError::Config("fetch.timeout_secs must be at least 1".to_string()).into(),
            );
        }
        if self.workers == 0 {
            return Err(ListforgeError::Config("fetch.workers must be at least 1".to_string()).into());
        }
        Ok(())
    }
}

fn source(name: &str, url: &str) -> Source {
    Source {
        name: name.to_string(),
        url: url.to_string(),
    }
}

fn default_categories() -> Vec<Category> {
    vec![
        Category {
            name: "ads".to_string(),
            sources: vec![
                source("adaway", "https://adaway.org/hosts.txt"),
                source(
                    "yoyo",
                    "https://pgl.yoyo.org/adservers/serverlist.php?hostformat=adblockplus&showintro=0&mimetype=plaintext",
                ),
                source(
                    "adguard_dns",
                    "https://adguardteam.github.io/AdGuardSDNSFilter/Filters/filter.txt",
                ),
            ],
        },
        Category {
            name: "tracking".to_string(),
            sources: vec![
                source("easyprivacy", "https://easylist.to/easylist/easyprivacy.txt"),
                source(
                    "windows_spy",
                    "https://raw.githubusercontent.com/crazy-max/WindowsSpyBlocker/master/data/hosts/spy.txt",
                ),
            ],
        },
        Category {
            name: "malware".to_string(),
            sources: vec![
                source("urlhaus", "https://urlhaus.abuse.ch/downloads/hostfile/"),
                source(
                    "phishing_army",
                    "https://phishing.army/download/phishing_army_blocklist.txt",
                ),
            ],
        },
    ]
}
