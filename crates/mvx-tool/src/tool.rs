//! `Tool`: the capability record every adapter implements (spec.md §4.8).

use crate::error::Result;
use async_trait::async_trait;
use mvx_archive::Algorithm;
use mvx_installer::ChecksumSource;
use mvx_platform::Platform;
use mvx_registry::VersionCandidate;
use mvx_version::Version;
use std::path::PathBuf;

/// Where the checksum for a given (version, filename) comes from, as
/// reported by an adapter (spec.md §4.8 `get_checksum`).
#[derive(Debug, Clone)]
pub enum ChecksumInfo {
    Inline { hex: String, algorithm: Algorithm },
    SiblingUrl { url: String, algorithm: Algorithm },
}

impl From<ChecksumInfo> for ChecksumSource {
    fn from(info: ChecksumInfo) -> Self {
        match info {
            ChecksumInfo::Inline { hex, algorithm } => ChecksumSource::Inline { hex, algorithm },
            ChecksumInfo::SiblingUrl { url, algorithm } => ChecksumSource::Listing { url, algorithm },
        }
    }
}

/// Per-tool installation config (distribution choice, system-tool
/// override, install root).
#[derive(Debug, Clone, Default)]
pub struct ToolConfig {
    pub distribution: Option<String>,
    pub use_system: bool,
    pub install_root: Option<PathBuf>,
}

/// The capability set every tool adapter realizes (spec.md §4.8).
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable identifier, e.g. `"java"`, `"maven"`, `"mvnd"`, `"node"`, `"go"`.
    fn name(&self) -> &str;

    /// Platform-adjusted binary name, e.g. `node`/`node.exe`.
    fn binary_name(&self, platform: &Platform) -> String {
        platform.exe_name(self.name())
    }

    fn display_name(&self) -> &str {
        self.name()
    }

    /// The tool's `*_HOME`-style env var name, if it has one
    /// (`JAVA_HOME`, `MAVEN_HOME`, `NODE_HOME`, `GOROOT`).
    fn home_env_var(&self) -> Option<&str> {
        None
    }

    async fn list_versions(&self) -> Result<Vec<VersionCandidate>>;

    async fn download_url(&self, version: &Version, platform: &Platform, cfg: &ToolConfig) -> Result<String>;

    async fn get_checksum(&self, version: &Version, filename: &str, cfg: &ToolConfig) -> Result<Option<ChecksumInfo>>;

    /// Relative path, from the install root, to the directory that should
    /// be prepended to `PATH` once resolved.
    fn bin_relative_path(&self, version: &Version, platform: &Platform) -> PathBuf;

    /// Relative path, from the install root, to the tool's home
    /// (differs from the bin dir for Java/Maven/Node/Go conventions).
    fn home_relative_path(&self, version: &Version, platform: &Platform) -> PathBuf {
        self.bin_relative_path(version, platform)
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default()
    }

    /// Run `<binary> <version-args>` and confirm stdout/stderr mentions
    /// the expected version (spec.md §4.8 `verify`).
    async fn verify(&self, install_dir: &std::path::Path, version: &Version, platform: &Platform) -> Result<bool>;
}
