use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("could not open archive {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("failed to extract {path}: {reason}")]
    Extraction { path: PathBuf, reason: String },

    #[error("archive format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("archive entry {entry:?} would extract outside of {destination}")]
    UnsafePath {
        entry: PathBuf,
        destination: PathBuf,
    },

    #[error("checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("no checksum entry found for {filename:?} in checksum listing")]
    ChecksumNotFound { filename: String },
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
