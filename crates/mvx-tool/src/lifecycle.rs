//! Standard install lifecycle shared by every tool adapter (spec.md §4.9).
//!
//! `resolve → check-installed → download → verify → extract → verify-binary`
//! runs as a single atomic sequence from the caller's perspective: the
//! install directory only appears at its final path once every step has
//! succeeded, via stage-then-rename through a `.tmp-<pid>` sibling
//! (grounded on the teacher's `Installer::download_with_layout`
//! rename-then-copy-fallback idiom).

use crate::error::{Result, ToolError};
use crate::path_cache::{PathCache, PathCacheKey};
use crate::tool::{Tool, ToolConfig};
use mvx_installer::{DownloadPlan, Downloader};
use mvx_platform::Platform;
use mvx_version::Version;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StandardLifecycle {
    downloader: Arc<Downloader>,
    path_cache: Arc<PathCache>,
    tools_dir: PathBuf,
}

impl StandardLifecycle {
    pub fn new(tools_dir: PathBuf) -> mvx_installer::Result<Self> {
        Ok(Self {
            downloader: Arc::new(Downloader::new()?),
            path_cache: Arc::new(PathCache::new()),
            tools_dir,
        })
    }

    pub fn path_cache(&self) -> &Arc<PathCache> {
        &self.path_cache
    }

    /// `<tools-dir>/<tool>/<version>[@<distribution>]` (spec.md §4.9 step 2).
    pub fn install_dir(&self, tool: &str, version: &Version, distribution: Option<&str>) -> PathBuf {
        let leaf = match distribution {
            Some(dist) => format!("{version}@{dist}"),
            None => version.to_string(),
        };
        self.tools_dir.join(tool).join(leaf)
    }

    /// Install `version` of `tool`, or confirm the system installation if
    /// `cfg.use_system` is set (spec.md §4.9 step 1).
    pub async fn standard_install(
        &self,
        tool: &dyn Tool,
        version: &Version,
        cfg: &ToolConfig,
    ) -> Result<PathBuf> {
        let platform = Platform::current();

        if cfg.use_system {
            let binary = tool.binary_name(&platform);
            return which::which(&binary)
                .map(|p| p.parent().map(|d| d.to_path_buf()).unwrap_or(p))
                .map_err(|_| ToolError::SystemToolUnavailable {
                    tool: tool.name().to_string(),
                    binary,
                });
        }

        let install_dir = self.install_dir(tool.name(), version, cfg.distribution.as_deref());
        let bin_dir = install_dir.join(tool.bin_relative_path(version, &platform));

        if install_dir.exists() {
            if self.verify_binary(tool, &install_dir, version, &platform).await? {
                return Ok(bin_dir);
            }
            warn!(
                "{} {} install dir exists but failed verification, reinstalling",
                tool.name(),
                version
            );
            let _ = std::fs::remove_dir_all(&install_dir);
        }

        let url = tool.download_url(version, &platform, cfg).await?;
        let filename = url.split('/').next_back().unwrap_or("download").to_string();

        let staging_dir = self.tools_dir.join(tool.name()).join(format!(
            ".tmp-{}-{}",
            version,
            std::process::id()
        ));
        if staging_dir.exists() {
            std::fs::remove_dir_all(&staging_dir).map_err(|e| ToolError::ConfigurationError {
                tool: tool.name().to_string(),
                message: format!("could not clear stale staging dir: {e}"),
            })?;
        }
        std::fs::create_dir_all(&staging_dir).map_err(|e| ToolError::ConfigurationError {
            tool: tool.name().to_string(),
            message: e.to_string(),
        })?;

        let archive_path = staging_dir.join(&filename);
        let checksum_info = tool.get_checksum(version, &filename, cfg).await?;

        let mut plan = DownloadPlan::new(tool.name(), version.to_string(), url.clone(), archive_path.clone());
        if let Some(info) = checksum_info {
            plan = plan.with_checksum(info.into());
        }

        info!("downloading {} {} from {}", tool.name(), version, mvx_installer::display_url(&url, None));

        let outcome = self.downloader.download(&plan).await.map_err(|e| ToolError::NetworkError {
            tool: tool.name().to_string(),
            version: version.to_string(),
            source: e,
        })?;
        debug!("{} {}: {} bytes from {}", tool.name(), version, outcome.bytes_written, outcome.final_url);

        let extract_dir = staging_dir.join("extracted");
        mvx_archive::extract(&archive_path, &extract_dir).map_err(|e| {
            if matches!(e, mvx_archive::ArchiveError::UnsafePath { .. }) {
                ToolError::UnsafePath {
                    tool: tool.name().to_string(),
                    version: version.to_string(),
                    install_dir: extract_dir.clone(),
                }
            } else {
                ToolError::ChecksumMismatch {
                    tool: tool.name().to_string(),
                    version: version.to_string(),
                    source: e,
                }
            }
        })?;

        if !self.verify_binary(tool, &extract_dir, version, &platform).await? {
            let _ = std::fs::remove_dir_all(&staging_dir);
            return Err(ToolError::VerificationFailed {
                tool: tool.name().to_string(),
                version: version.to_string(),
            });
        }

        if let Some(parent) = install_dir.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ToolError::ConfigurationError {
                tool: tool.name().to_string(),
                message: e.to_string(),
            })?;
        }
        stage_then_rename(&extract_dir, &install_dir).map_err(|e| ToolError::ConfigurationError {
            tool: tool.name().to_string(),
            message: e.to_string(),
        })?;
        let _ = std::fs::remove_dir_all(&staging_dir);

        self.path_cache.clear_tool(tool.name());
        self.path_cache.publish(
            PathCacheKey::new(tool.name(), version.to_string(), cfg.distribution.clone()),
            bin_dir.clone(),
        );

        Ok(bin_dir)
    }

    async fn verify_binary(
        &self,
        tool: &dyn Tool,
        install_dir: &Path,
        version: &Version,
        platform: &Platform,
    ) -> Result<bool> {
        if !install_dir.exists() {
            return Ok(false);
        }
        tool.verify(install_dir, version, platform).await
    }
}

/// Rename first (atomic on the same filesystem); fall back to a recursive
/// copy if the staging dir and destination live on different filesystems.
fn stage_then_rename(staged: &Path, dest: &Path) -> std::io::Result<()> {
    match std::fs::rename(staged, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            copy_dir_recursive(staged, dest)?;
            std::fs::remove_dir_all(staged)
        }
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_dir_includes_distribution_suffix() {
        let lifecycle = StandardLifecycle {
            downloader: Arc::new(Downloader::with_client(reqwest::Client::new())),
            path_cache: Arc::new(PathCache::new()),
            tools_dir: PathBuf::from("/opt/mvx/tools"),
        };
        let version: Version = "21.0.4".parse().unwrap();
        let dir = lifecycle.install_dir("java", &version, Some("temurin"));
        assert_eq!(dir, PathBuf::from("/opt/mvx/tools/java/21.0.4@temurin"));
    }

    #[test]
    fn install_dir_without_distribution() {
        let lifecycle = StandardLifecycle {
            downloader: Arc::new(Downloader::with_client(reqwest::Client::new())),
            path_cache: Arc::new(PathCache::new()),
            tools_dir: PathBuf::from("/opt/mvx/tools"),
        };
        let version: Version = "20.17.0".parse().unwrap();
        let dir = lifecycle.install_dir("node", &version, None);
        assert_eq!(dir, PathBuf::from("/opt/mvx/tools/node/20.17.0"));
    }
}
