//! Robust downloading: retries, redirect tracking, size and magic
//! validation, checksum verification, and friendly URL logging.

mod downloader;
mod error;
mod plan;
mod url_pretty;

pub use downloader::{Downloader, USER_AGENT};
pub use error::{DownloadError, Result};
pub use plan::{ChecksumSource, DownloadOutcome, DownloadPlan};
pub use url_pretty::display_url;
