//! Error taxonomy for the tool lifecycle (spec.md §7). Every variant
//! carries enough context (tool, version, cause) to build a useful
//! user-facing message without the caller re-deriving it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool {name:?}")]
    UnknownTool { name: String },

    #[error("no version of {tool} matches spec {spec:?}")]
    VersionResolutionFailed { tool: String, spec: String },

    #[error("{tool} is configured to use the system installation, but no `{binary}` was found on PATH")]
    SystemToolUnavailable { tool: String, binary: String },

    #[error("network error installing {tool} {version}: {source}")]
    NetworkError {
        tool: String,
        version: String,
        #[source]
        source: mvx_installer::DownloadError,
    },

    #[error("{tool} {version}: server returned HTTP {status}")]
    HttpStatus {
        tool: String,
        version: String,
        status: u16,
    },

    #[error("{tool} {version}: downloaded archive is smaller than the expected minimum size")]
    TooSmall { tool: String, version: String },

    #[error("{tool} {version}: downloaded archive exceeds the maximum allowed size")]
    TooLarge { tool: String, version: String },

    #[error("{tool} {version}: downloaded file does not match the expected format signature")]
    MagicMismatch { tool: String, version: String },

    #[error("{tool} {version}: checksum mismatch")]
    ChecksumMismatch {
        tool: String,
        version: String,
        #[source]
        source: mvx_archive::ArchiveError,
    },

    #[error("{tool} {version}: archive entry attempted to extract outside of {install_dir}")]
    UnsafePath {
        tool: String,
        version: String,
        install_dir: PathBuf,
    },

    #[error("{tool} {version}: installed binary did not report the expected version")]
    VerificationFailed { tool: String, version: String },

    #[error("invalid configuration for {tool}: {message}")]
    ConfigurationError { tool: String, message: String },

    #[error("{} of {} tools failed to install", .errors.len(), .errors.len() + successes)]
    BatchError {
        errors: Vec<ToolError>,
        successes: usize,
    },
}

impl ToolError {
    pub fn tool_name(&self) -> Option<&str> {
        match self {
            ToolError::UnknownTool { name } => Some(name),
            ToolError::VersionResolutionFailed { tool, .. }
            | ToolError::SystemToolUnavailable { tool, .. }
            | ToolError::NetworkError { tool, .. }
            | ToolError::HttpStatus { tool, .. }
            | ToolError::TooSmall { tool, .. }
            | ToolError::TooLarge { tool, .. }
            | ToolError::MagicMismatch { tool, .. }
            | ToolError::ChecksumMismatch { tool, .. }
            | ToolError::UnsafePath { tool, .. }
            | ToolError::VerificationFailed { tool, .. }
            | ToolError::ConfigurationError { tool, .. } => Some(tool),
            ToolError::BatchError { .. } => None,
        }
    }

    /// Whether the downloader should retry this failure at all (spec.md §7).
    /// `HttpStatus` only retries on 5xx; size/magic guards get one retry
    /// handled by the caller's retry-once policy, modeled here as
    /// "recoverable" and left to the orchestrator to bound.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ToolError::NetworkError { .. } => true,
            ToolError::HttpStatus { status, .. } => (500..600).contains(status),
            ToolError::TooSmall { .. } | ToolError::TooLarge { .. } | ToolError::MagicMismatch { .. } => true,
            ToolError::ChecksumMismatch { source, .. } => {
                matches!(source, mvx_archive::ArchiveError::ChecksumNotFound { .. })
            }
            _ => false,
        }
    }
}

/// Map an error to a short, human-readable diagnosis (spec.md §7's
/// "error-diagnosis helper").
pub fn diagnose(error: &ToolError) -> &'static str {
    match error {
        ToolError::TooSmall { .. } => {
            "archive shorter than expected minimum size — likely rate-limited or redirected to an HTML page"
        }
        ToolError::TooLarge { .. } => "archive larger than expected — upstream layout may have changed",
        ToolError::MagicMismatch { .. } => {
            "downloaded file does not look like the expected archive format — check the URL"
        }
        ToolError::ChecksumMismatch { .. } => "checksum mismatch — download may be corrupt or tampered with",
        ToolError::UnsafePath { .. } => "archive contains an entry that would extract outside the install directory",
        ToolError::VerificationFailed { .. } => "installed binary did not respond as expected",
        ToolError::SystemToolUnavailable { .. } => "system tool was requested but is not on PATH",
        ToolError::HttpStatus { status, .. } if (500..600).contains(status) => {
            "upstream server error — usually transient"
        }
        ToolError::HttpStatus { .. } => "upstream returned an unexpected HTTP status",
        ToolError::VersionResolutionFailed { .. } => "no published version matches the requested spec",
        ToolError::UnknownTool { .. } => "tool name is not registered",
        ToolError::ConfigurationError { .. } => "configuration is invalid or self-contradictory",
        ToolError::NetworkError { .. } => "network transport failure",
        ToolError::BatchError { .. } => "one or more tools failed to install",
    }
}

pub type Result<T> = std::result::Result<T, ToolError>;
