//! HTTP fetcher for downloading blocklists into the local cache.

use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::FetchSettings;
use crate::error::ListforgeError;
use crate::utils::format_bytes;

/// One source to download: where from and where to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub url: String,
    pub path: PathBuf,
}

/// Outcome of a completed download
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub url: String,
    pub path: PathBuf,
    /// HTTP status of the response that was saved
    pub status: u16,
    pub bytes: usize,
    /// Attempt that completed, starting at 1
    pub attempt: u32,
}

impl DownloadReport {
    /// Only a plain `200 OK` counts; any other status was saved with a warning
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// HTTP client for fetching lists
pub struct Fetcher {
    client: Client,
    retries: u32,
    workers: usize,
    retry_delay: Duration,
}

impl Fetcher {
    /// Create a new fetcher from download settings
    pub fn new(settings: &FetchSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(format!("listforge/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ListforgeError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retries: settings.retries.max(1),
            workers: settings.workers.max(1),
            retry_delay: Duration::from_millis(settings.retry_delay_ms),
        })
    }

    /// Download one source into its cache file, with retries.
    ///
    /// Any HTTP response completes the download, whatever its status; only
    /// transport failures are retried. When every attempt fails the cache
    /// file is emptied so a previous run's content is not reused.
    pub async fn download(&self, job: &DownloadJob) -> Result<DownloadReport, ListforgeError> {
        let mut last_error = String::from("no attempt made");

        for attempt in 1..=self.retries {
            if attempt > 1 && !self.retry_delay.is_zero() {
                let delay = self.backoff(attempt);
                debug!("Retry {} after {:?} for {}", attempt, delay, job.url);
                tokio::time::sleep(delay).await;
            }

            match self.fetch_once(&job.url).await {
                Ok((status, body)) => {
                    if status != 200 {
                        warn!(
                            "Status {} for {} (saving response body to {:?})",
                            status, job.url, job.path
                        );
                    }

                    write_cache(&job.path, body.as_bytes()).await?;
                    info!(
                        "Fetched {} ({}) -> {:?}",
                        job.url,
                        format_bytes(body.len() as u64),
                        job.path
                    );

                    return Ok(DownloadReport {
                        url: job.url.clone(),
                        path: job.path.clone(),
                        status,
                        bytes: body.len(),
                        attempt,
                    });
                }
                Err(e) => {
                    error!(
                        "Download failed ({}/{}) for {}: {}",
                        attempt, self.retries, job.url, e
                    );
                    last_error = e.to_string();
                }
            }
        }

        error!("[FATAL] Failed after {} attempts: {}", self.retries, job.url);
        if let Err(e) = write_cache(&job.path, b"").await {
            warn!("Could not reset cache file: {}", e);
        }

        Err(ListforgeError::Exhausted {
            url: job.url.clone(),
            attempts: self.retries,
            reason: last_error,
        })
    }

    /// Download every job concurrently, at most `workers` at a time.
    ///
    /// Each job fails on its own; the returned vector holds one result per
    /// job, in completion order.
    pub async fn download_all(
        &self,
        jobs: &[DownloadJob],
    ) -> Vec<Result<DownloadReport, ListforgeError>> {
        stream::iter(jobs.iter().map(|job| self.download(job)))
            .buffer_unordered(self.workers)
            .collect()
            .await
    }

    /// Delay before `attempt`: the base delay, doubled per earlier retry
    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay
            .saturating_mul(1 << attempt.saturating_sub(2).min(16))
    }

    /// One GET request; the body is decoded lossily
    async fn fetch_once(&self, url: &str) -> Result<(u16, String), reqwest::Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        Ok((status, String::from_utf8_lossy(&bytes).into_owned()))
    }
}

/// Overwrite a cache file, creating its parent directories
async fn write_cache(path: &Path, contents: &[u8]) -> Result<(), ListforgeError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            ListforgeError::FileSystem(format!("Failed to create {:?}: {}", parent, e))
        })?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| ListforgeError::FileSystem(format!("Failed to write {:?}: {}", path, e)))
}
