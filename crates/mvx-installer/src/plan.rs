use std::path::PathBuf;
use std::time::Duration;

/// Where a checksum to verify against comes from (spec.md §3 `DownloadPlan`).
#[derive(Debug, Clone)]
pub enum ChecksumSource {
    /// The expected hex digest is already known.
    Inline {
        hex: String,
        algorithm: mvx_archive::Algorithm,
    },
    /// Fetch a checksum-listing file from a URL and look up the entry
    /// matching the download's filename.
    Listing {
        url: String,
        algorithm: mvx_archive::Algorithm,
    },
}

/// A fully-specified download request (spec.md §3 `DownloadPlan`).
#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub url: String,
    pub dest_path: PathBuf,
    pub min_size: u64,
    pub max_size: u64,
    pub expected_magic: Option<Vec<u8>>,
    pub max_retries: usize,
    pub retry_delay: Duration,
    pub tool_name: String,
    pub version: String,
    pub checksum_source: Option<ChecksumSource>,
}

impl DownloadPlan {
    pub fn new(tool_name: impl Into<String>, version: impl Into<String>, url: impl Into<String>, dest_path: PathBuf) -> Self {
        Self {
            url: url.into(),
            dest_path,
            min_size: 1024,
            max_size: 2 * 1024 * 1024 * 1024,
            expected_magic: None,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            tool_name: tool_name.into(),
            version: version.into(),
            checksum_source: None,
        }
    }

    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_expected_magic(mut self, magic: Vec<u8>) -> Self {
        self.expected_magic = Some(magic);
        self
    }

    pub fn with_checksum(mut self, source: ChecksumSource) -> Self {
        self.checksum_source = Some(source);
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Result of a successful download (spec.md §4.5 `download(plan) →
/// { final_url, bytes_written }`).
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub final_url: String,
    pub bytes_written: u64,
}
