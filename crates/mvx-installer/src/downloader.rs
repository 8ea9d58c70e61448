//! Streaming downloader with retries, redirects, size/magic validation
//! and checksum verification (spec.md §4.5).

use crate::error::{DownloadError, Result};
use crate::plan::{ChecksumSource, DownloadOutcome, DownloadPlan};
use crate::url_pretty::display_url;
use backon::{ExponentialBuilder, Retryable};
use futures_util::StreamExt;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

pub const USER_AGENT: &str = concat!("mvx-engine/", env!("CARGO_PKG_VERSION"));
const REDIRECT_CAP: usize = 10;

pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(REDIRECT_CAP))
            .timeout(Duration::from_secs(600))
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn retry_strategy(&self, plan: &DownloadPlan) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(plan.retry_delay)
            .with_max_delay(Duration::from_secs(30))
            .with_max_times(plan.max_retries)
            .with_jitter()
    }

    /// Execute a download plan, retrying recoverable failures with
    /// exponential backoff (spec.md §4.5).
    pub async fn download(&self, plan: &DownloadPlan) -> Result<DownloadOutcome> {
        let strategy = self.retry_strategy(plan);
        (|| async { self.download_once(plan).await })
            .retry(strategy)
            .notify(|err: &DownloadError, dur: Duration| {
                warn!("download of {} failed: {err}, retrying in {:?}", plan.url, dur);
            })
            .when(DownloadError::is_recoverable)
            .await
    }

    async fn download_once(&self, plan: &DownloadPlan) -> Result<DownloadOutcome> {
        if let Some(parent) = plan.dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let response = self.client.get(&plan.url).send().await.map_err(|e| {
            if e.is_timeout() {
                DownloadError::NetworkTimeout { url: plan.url.clone() }
            } else if e.is_redirect() {
                DownloadError::TooManyRedirects {
                    url: plan.url.clone(),
                    cap: REDIRECT_CAP,
                }
            } else {
                DownloadError::Failed {
                    url: plan.url.clone(),
                    reason: e.to_string(),
                }
            }
        })?;

        let final_url = response.url().to_string();
        if !response.status().is_success() {
            return Err(DownloadError::HttpStatus {
                url: final_url,
                status: response.status().as_u16(),
            });
        }

        let content_disposition_filename = response
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_filename_from_disposition);

        debug!(
            "downloading from {}",
            display_url(&final_url, content_disposition_filename.as_deref())
        );

        let tmp_path = tmp_path_for(&plan.dest_path);
        let mut file = std::fs::File::create(&tmp_path)?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DownloadError::Failed {
                url: plan.url.clone(),
                reason: format!("stream error: {e}"),
            })?;
            written += chunk.len() as u64;
            if written > plan.max_size {
                let _ = std::fs::remove_file(&tmp_path);
                return Err(DownloadError::TooLarge {
                    path: plan.dest_path.clone(),
                    maximum: plan.max_size,
                });
            }
            file.write_all(&chunk)?;
        }
        file.flush()?;
        drop(file);

        if written < plan.min_size {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(DownloadError::TooSmall {
                path: plan.dest_path.clone(),
                actual: written,
                minimum: plan.min_size,
            });
        }

        if let Some(magic) = &plan.expected_magic {
            if !matches_magic(&tmp_path, magic)? {
                let _ = std::fs::remove_file(&tmp_path);
                return Err(DownloadError::MagicMismatch {
                    path: plan.dest_path.clone(),
                });
            }
        }

        if let Some(source) = &plan.checksum_source {
            if let Err(e) = self.verify_checksum(&tmp_path, &plan.dest_path, source).await {
                let _ = std::fs::remove_file(&tmp_path);
                return Err(e);
            }
        }

        std::fs::rename(&tmp_path, &plan.dest_path)?;

        debug!("downloaded {written} bytes from {}", display_url(&final_url, None));

        Ok(DownloadOutcome {
            final_url,
            bytes_written: written,
        })
    }

    async fn verify_checksum(
        &self,
        tmp_path: &Path,
        dest_path: &Path,
        source: &ChecksumSource,
    ) -> Result<()> {
        match source {
            ChecksumSource::Inline { hex, algorithm } => {
                mvx_archive::verify_file(tmp_path, hex, *algorithm).map_err(DownloadError::Checksum)?;
            }
            ChecksumSource::Listing { url, algorithm } => {
                let listing = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| DownloadError::Failed {
                        url: url.clone(),
                        reason: e.to_string(),
                    })?
                    .text()
                    .await
                    .map_err(|e| DownloadError::Failed {
                        url: url.clone(),
                        reason: e.to_string(),
                    })?;
                let entries = mvx_archive::parse_checksum_listing(&listing);
                let filename = dest_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default();
                let entry = mvx_archive::find_checksum(&entries, filename).ok_or_else(|| {
                    DownloadError::ChecksumListing(mvx_archive::ArchiveError::ChecksumNotFound {
                        filename: filename.to_string(),
                    })
                })?;
                mvx_archive::verify_file(tmp_path, &entry.hash, *algorithm).map_err(DownloadError::ChecksumListing)?;
            }
        }
        Ok(())
    }

    /// HEAD a URL without downloading, for availability probes (used by
    /// mvnd's dual-host fallback).
    pub async fn check_url(&self, url: &str) -> bool {
        matches!(self.client.head(url).send().await, Ok(r) if r.status().is_success())
    }
}

fn tmp_path_for(dest: &Path) -> std::path::PathBuf {
    let file_name = dest
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download");
    dest.with_file_name(format!("{file_name}.part-{}", std::process::id()))
}

fn matches_magic(path: &Path, magic: &[u8]) -> Result<bool> {
    use std::io::Read;
    let mut file = std::fs::File::open(path)?;
    let mut buf = vec![0u8; magic.len()];
    if file.read_exact(&mut buf).is_err() {
        return Ok(false);
    }
    Ok(buf == magic)
}

fn extract_filename_from_disposition(value: &str) -> Option<String> {
    value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|s| s.trim_matches('"').to_string())
}
