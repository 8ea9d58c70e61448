//! Maven Daemon adapter: dual-host fallback (spec.md §4.8) — a primary
//! `dist.apache.org` URL is tried first, then `archive.apache.org`,
//! alternating across a 3-attempt budget so a single flaky host doesn't
//! burn the whole retry budget.

use async_trait::async_trait;
use mvx_archive::Algorithm;
use mvx_installer::Downloader;
use mvx_platform::{Os, Platform};
use mvx_registry::{fetch_apache_index, VersionCandidate};
use mvx_tool::{ChecksumInfo, Tool, ToolConfig, ToolError};
use mvx_version::Version;
use std::path::{Path, PathBuf};
use tracing::warn;

const INDEX_URL: &str = "https://dist.apache.org/repos/dist/release/maven/mvnd/";
const PRIMARY_HOST: &str = "https://dist.apache.org/repos/dist/release/maven/mvnd";
const SECONDARY_HOST: &str = "https://archive.apache.org/dist/maven/mvnd";
const MAX_ATTEMPTS: usize = 3;

const FALLBACK_VERSIONS: &[&str] = &["1.0.2", "0.9.0"];

pub struct MvndTool {
    client: reqwest::Client,
    downloader: Downloader,
}

impl MvndTool {
    pub fn new(client: reqwest::Client) -> Self {
        let downloader = Downloader::with_client(client.clone());
        Self { client, downloader }
    }

    fn archive_filename(version: &Version, platform: &Platform) -> String {
        let os_tag = match platform.os {
            Os::Windows => "windows-amd64",
            Os::MacOS => "darwin-amd64",
            _ => "linux-amd64",
        };
        let ext = if platform.os == Os::Windows { "zip" } else { "tar.gz" };
        format!("mvnd-{version}-{os_tag}.{ext}")
    }

    /// Alternate between the two hosts, probing availability, within a
    /// 3-attempt budget (spec.md §4.8).
    async fn resolve_host(&self, filename: &str) -> &'static str {
        let hosts = [PRIMARY_HOST, SECONDARY_HOST, PRIMARY_HOST];
        for host in hosts.into_iter().take(MAX_ATTEMPTS) {
            let url = format!("{host}/{filename}");
            if self.downloader.check_url(&url).await {
                return host;
            }
            warn!("mvnd host {host} unavailable for {filename}, trying next");
        }
        PRIMARY_HOST
    }
}

#[async_trait]
impl Tool for MvndTool {
    fn name(&self) -> &str {
        "mvnd"
    }

    fn display_name(&self) -> &str {
        "Maven Daemon"
    }

    fn home_env_var(&self) -> Option<&str> {
        Some("MVND_HOME")
    }

    async fn list_versions(&self) -> mvx_tool::Result<Vec<VersionCandidate>> {
        fetch_apache_index(&self.client, INDEX_URL, FALLBACK_VERSIONS)
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "mvnd".to_string(),
                message: e.to_string(),
            })
    }

    async fn download_url(&self, version: &Version, platform: &Platform, _cfg: &ToolConfig) -> mvx_tool::Result<String> {
        let filename = Self::archive_filename(version, platform);
        let host = self.resolve_host(&filename).await;
        Ok(format!("{host}/{filename}"))
    }

    async fn get_checksum(&self, version: &Version, _filename: &str, _cfg: &ToolConfig) -> mvx_tool::Result<Option<ChecksumInfo>> {
        let platform = Platform::current();
        let filename = Self::archive_filename(version, &platform);
        let host = self.resolve_host(&filename).await;
        let url = format!("{host}/{filename}.sha512");
        let response = self.client.get(&url).send().await.map_err(|e| ToolError::ConfigurationError {
            tool: "mvnd".to_string(),
            message: e.to_string(),
        })?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let body = response.text().await.map_err(|e| ToolError::ConfigurationError {
            tool: "mvnd".to_string(),
            message: e.to_string(),
        })?;
        let hex = body.split_whitespace().next().unwrap_or_default().to_string();
        if hex.is_empty() {
            return Ok(None);
        }
        Ok(Some(ChecksumInfo::Inline {
            hex,
            algorithm: Algorithm::Sha512,
        }))
    }

    // The archive's single top-level directory (`mvnd-{version}-{os_tag}/`)
    // is stripped during extraction (spec.md §4.3.5), leaving `bin/` flat
    // under the install dir.
    fn bin_relative_path(&self, _version: &Version, _platform: &Platform) -> PathBuf {
        PathBuf::from("bin")
    }

    async fn verify(&self, install_dir: &Path, version: &Version, platform: &Platform) -> mvx_tool::Result<bool> {
        let exe = install_dir
            .join(self.bin_relative_path(version, platform))
            .join(platform.exe_name("mvnd"));
        if !exe.exists() {
            return Ok(false);
        }
        let output = tokio::process::Command::new(&exe)
            .arg("--version")
            .output()
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "mvnd".to_string(),
                message: e.to_string(),
            })?;
        let combined = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        Ok(combined.contains(version.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_filename_uses_linux_tag_by_default() {
        let version: Version = "1.0.2".parse().unwrap();
        let platform = Platform {
            os: Os::Linux,
            arch: mvx_platform::Arch::Amd64,
            libc: mvx_platform::Libc::Gnu,
        };
        assert_eq!(MvndTool::archive_filename(&version, &platform), "mvnd-1.0.2-linux-amd64.tar.gz");
    }

    #[test]
    fn archive_filename_uses_zip_on_windows() {
        let version: Version = "1.0.2".parse().unwrap();
        let platform = Platform {
            os: Os::Windows,
            arch: mvx_platform::Arch::Amd64,
            libc: mvx_platform::Libc::Gnu,
        };
        assert_eq!(MvndTool::archive_filename(&version, &platform), "mvnd-1.0.2-windows-amd64.zip");
    }
}
