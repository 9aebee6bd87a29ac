//! Per-category and aggregate rule list building.
//!
//! Each category's cached sources are converted in registry order and
//! concatenated; every category is then appended to the aggregate. Nothing
//! is deduplicated: overlapping sources keep their duplicate rules.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::allowlist::Allowlist;
use crate::config::{cache_file_path, Category, Config};
use crate::fs_abstraction::{read_lossy, FileSystem};
use crate::rules::{convert_lines, to_restricted, ConvertedList};
use crate::utils::format_count;

/// Output file flavours written for each category and for the aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Canonical `||domain^` rules
    Canonical,
    /// AdGuard syntax (same content as canonical)
    Adguard,
    /// Bare domains for Pi-hole
    Pihole,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::Canonical,
        OutputFormat::Adguard,
        OutputFormat::Pihole,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Canonical => "txt",
            OutputFormat::Adguard => "adguard",
            OutputFormat::Pihole => "pihole",
        }
    }
}

/// Rules gathered for one category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryOutput {
    pub name: String,
    pub rules: Vec<String>,
    pub restricted: Vec<String>,
    /// Kept rules that did not look like a hostname
    pub invalid: usize,
    /// Sources whose cache file was absent
    pub missing: usize,
}

/// Counts for one category, as reported after a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub name: String,
    pub rules: usize,
    pub restricted: usize,
    pub invalid: usize,
    pub missing: usize,
}

/// Result of a full build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub categories: Vec<CategoryStats>,
    pub total_rules: usize,
    pub total_restricted: usize,
}

/// Builds output files from cached sources
pub struct Builder<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
    cache_dir: PathBuf,
    output_dir: PathBuf,
    aggregate_name: String,
    allowlist: &'a Allowlist,
}

impl<'a, F: FileSystem + ?Sized> Builder<'a, F> {
    pub fn new(
        fs: &'a F,
        cache_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        aggregate_name: impl Into<String>,
        allowlist: &'a Allowlist,
    ) -> Self {
        Self {
            fs,
            cache_dir: cache_dir.into(),
            output_dir: output_dir.into(),
            aggregate_name: aggregate_name.into(),
            allowlist,
        }
    }

    /// Builder using the directories and aggregate name from `config`
    pub fn from_config(fs: &'a F, config: &Config, allowlist: &'a Allowlist) -> Self {
        Self::new(
            fs,
            &config.cache_dir,
            &config.output_dir,
            config.aggregate_name.as_str(),
            allowlist,
        )
    }

    /// Convert one cached source. Unreadable files contribute nothing.
    ///
    /// Returns the converted rules and whether the file was missing.
    pub fn convert_source(&self, path: &Path) -> (ConvertedList, bool) {
        match read_lossy(self.fs, path) {
            Ok(text) => (convert_lines(&text, self.allowlist), false),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("[Missing File] {}", path.display());
                (Default::default(), true)
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                (Default::default(), false)
            }
        }
    }

    /// Convert every source of a category, in order
    pub fn build_category(&self, category: &Category) -> CategoryOutput {
        let mut output = CategoryOutput {
            name: category.name.clone(),
            ..Default::default()
        };

        for source in &category.sources {
            let path = cache_file_path(&self.cache_dir, &category.name, &source.name);
            let (converted, missing) = self.convert_source(&path);

            output.restricted.extend(to_restricted(&converted.rules));
            output.rules.extend(converted.rules);
            output.invalid += converted.invalid;
            if missing {
                output.missing += 1;
            }
        }

        output
    }

    /// Write `<stem>.txt`, `<stem>.adguard` and `<stem>.pihole`
    pub fn write_outputs(&self, stem: &str, rules: &[String], restricted: &[String]) -> Result<()> {
        self.fs
            .create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", self.output_dir))?;

        for format in OutputFormat::ALL {
            let lines = match format {
                OutputFormat::Canonical | OutputFormat::Adguard => rules,
                OutputFormat::Pihole => restricted,
            };
            let path = self.output_path(stem, format);
            self.fs
                .write(&path, lines.join("\n").as_bytes())
                .with_context(|| format!("Failed to write {:?}", path))?;
        }

        Ok(())
    }

    /// Build and write every category, then the aggregate
    pub fn build_all(&self, categories: &[Category]) -> Result<BuildSummary> {
        let mut all_rules: Vec<String> = Vec::new();
        let mut all_restricted: Vec<String> = Vec::new();
        let mut summary = BuildSummary::default();

        for category in categories {
            let output = self.build_category(category);
            self.write_outputs(&output.name, &output.rules, &output.restricted)?;

            info!(
                "{}: {} rules, {} pihole entries",
                output.name,
                format_count(output.rules.len()),
                format_count(output.restricted.len())
            );

            summary.categories.push(CategoryStats {
                name: output.name,
                rules: output.rules.len(),
                restricted: output.restricted.len(),
                invalid: output.invalid,
                missing: output.missing,
            });
            all_rules.extend(output.rules);
            all_restricted.extend(output.restricted);
        }

        self.write_outputs(&self.aggregate_name, &all_rules, &all_restricted)?;
        info!(
            "{}: {} rules, {} pihole entries",
            self.aggregate_name,
            format_count(all_rules.len()),
            format_count(all_restricted.len())
        );

        summary.total_rules = all_rules.len();
        summary.total_restricted = all_restricted.len();
        Ok(summary)
    }

    pub fn output_path(&self, stem: &str, format: OutputFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", stem, format.extension()))
    }
}
