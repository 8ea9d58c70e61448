use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("request to {url} timed out")]
    NetworkTimeout { url: String },

    #[error("download of {url} failed: {reason}")]
    Failed { url: String, reason: String },

    #[error("server at {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("downloaded file {path} is {actual} bytes, smaller than the expected minimum of {minimum}")]
    TooSmall {
        path: PathBuf,
        actual: u64,
        minimum: u64,
    },

    #[error("downloaded file {path} exceeded the maximum allowed size of {maximum} bytes")]
    TooLarge { path: PathBuf, maximum: u64 },

    #[error("downloaded file {path} does not start with the expected magic bytes")]
    MagicMismatch { path: PathBuf },

    /// Mismatch against a checksum the caller already had in hand
    /// (spec.md §3 `ChecksumSource::Inline`). Re-downloading the same
    /// bytes can't change this, so it's fatal.
    #[error(transparent)]
    Checksum(mvx_archive::ArchiveError),

    /// Mismatch against a checksum fetched from a sibling listing file
    /// (`ChecksumSource::Listing`). The listing itself may be stale or
    /// the fetch may have raced a publish, so this is worth retrying.
    #[error(transparent)]
    ChecksumListing(mvx_archive::ArchiveError),

    #[error("too many redirects following {url} (cap {cap})")]
    TooManyRedirects { url: String, cap: usize },
}

impl DownloadError {
    /// Whether a retry is worth attempting. Deterministic failures
    /// (unsafe paths, a magic mismatch against a byte-identical file, a
    /// checksum mismatch against an inline expected value, a 4xx HTTP
    /// status) never get a different answer on retry (spec.md §4.5.7).
    pub fn is_recoverable(&self) -> bool {
        match self {
            DownloadError::MagicMismatch { .. } | DownloadError::Checksum(_) => false,
            DownloadError::HttpStatus { status, .. } => *status >= 500,
            _ => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, DownloadError>;
