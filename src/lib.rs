//! # listforge - Categorized Domain Blocklist Builder
//!
//! Downloads categorized hosts-file and adblock-style blocklists, rewrites
//! every entry into a canonical `||domain^` rule, drops comments, paths and
//! allowlisted domains, and writes the result in three flavours per
//! category plus a merged aggregate.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        listforge                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: run, fetch, build, check, config          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml)                                        │
//! │    └── Registry: category -> ordered sources                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + futures)                                │
//! │    └── Parallel downloads with retries into the cache      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Rules (regex)                                              │
//! │    ├── Normalize: hosts / adblock line -> ||domain^         │
//! │    ├── Filter: allowlist, comments, paths, modifiers        │
//! │    └── Convert: ||domain^ -> domain (Pi-hole)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Aggregator                                                 │
//! │    └── <category>.txt/.adguard/.pihole + list.*             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use listforge::aggregator::Builder;
//! use listforge::allowlist::Allowlist;
//! use listforge::config::Config;
//! use listforge::fetcher::Fetcher;
//! use listforge::fs_abstraction::real_fs;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_or_default("listforge.yaml")?;
//!
//!     // Download every source; failures only affect their own source
//!     let fetcher = Fetcher::new(&config.fetch)?;
//!     let _results = fetcher.download_all(&config.download_jobs()).await;
//!
//!     // Convert cached lists and write the outputs
//!     let allowlist = Allowlist::load(real_fs(), &config.allowlist)?;
//!     let builder = Builder::from_config(real_fs(), &config, &allowlist);
//!     let summary = builder.build_all(&config.categories)?;
//!     println!("{} rules", summary.total_rules);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`] - Per-category and aggregate output building
//! - [`allowlist`] - Substring allowlist
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Typed errors
//! - [`fetcher`] - HTTP client for downloading blocklists
//! - [`fs_abstraction`] - Filesystem seam for testing
//! - [`rules`] - Rule normalization, filtering and conversion
//! - [`utils`] - Formatting helpers
//! - [`validation`] - Name and URL validation

pub mod aggregator;
pub mod allowlist;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod fs_abstraction;
pub mod rules;
pub mod utils;
pub mod validation;

pub use cli::{Cli, Commands};
pub use config::Config;
