//! Go adapter: `.tar.gz`/`.zip` download; the archive's single top-level
//! `go/` directory is stripped during extraction (spec.md §4.3.5), so the
//! install dir itself is the home.

use async_trait::async_trait;
use mvx_archive::Algorithm;
use mvx_platform::{Os, Platform};
use mvx_registry::{go_checksum_for_filename, go_versions, VersionCandidate};
use mvx_tool::{ChecksumInfo, Tool, ToolConfig, ToolError};
use mvx_version::Version;
use std::path::{Path, PathBuf};

const DIST_BASE: &str = "https://go.dev/dl";

pub struct GoTool {
    client: reqwest::Client,
}

impl GoTool {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn archive_filename(version: &Version, platform: &Platform) -> String {
        let ext = if platform.os == Os::Windows { "zip" } else { "tar.gz" };
        format!("go{version}.{}-{}.{ext}", platform.os.as_str(), platform.arch.as_str())
    }
}

#[async_trait]
impl Tool for GoTool {
    fn name(&self) -> &str {
        "go"
    }

    fn display_name(&self) -> &str {
        "Go"
    }

    fn home_env_var(&self) -> Option<&str> {
        Some("GOROOT")
    }

    async fn list_versions(&self) -> mvx_tool::Result<Vec<VersionCandidate>> {
        go_versions(&self.client).await.map_err(|e| ToolError::ConfigurationError {
            tool: "go".to_string(),
            message: e.to_string(),
        })
    }

    async fn download_url(&self, version: &Version, platform: &Platform, _cfg: &ToolConfig) -> mvx_tool::Result<String> {
        Ok(format!("{DIST_BASE}/{}", Self::archive_filename(version, platform)))
    }

    async fn get_checksum(&self, version: &Version, _filename: &str, _cfg: &ToolConfig) -> mvx_tool::Result<Option<ChecksumInfo>> {
        let platform = Platform::current();
        let filename = Self::archive_filename(version, &platform);
        let hex = go_checksum_for_filename(&self.client, &filename)
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "go".to_string(),
                message: e.to_string(),
            })?;
        Ok(hex.map(|hex| ChecksumInfo::Inline {
            hex,
            algorithm: Algorithm::Sha256,
        }))
    }

    fn bin_relative_path(&self, _version: &Version, _platform: &Platform) -> PathBuf {
        PathBuf::from("bin")
    }

    fn home_relative_path(&self, _version: &Version, _platform: &Platform) -> PathBuf {
        PathBuf::from(".")
    }

    async fn verify(&self, install_dir: &Path, version: &Version, platform: &Platform) -> mvx_tool::Result<bool> {
        let exe = install_dir
            .join(self.bin_relative_path(version, platform))
            .join(platform.exe_name("go"));
        if !exe.exists() {
            return Ok(false);
        }
        let output = tokio::process::Command::new(&exe)
            .arg("version")
            .output()
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "go".to_string(),
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
    fn archive_filename_matches_go_dev_convention() {
        let version: Version = "1.23.1".parse().unwrap();
        let platform = Platform {
            os: Os::Linux,
            arch: mvx_platform::Arch::Amd64,
            libc: mvx_platform::Libc::Gnu,
        };
        assert_eq!(GoTool::archive_filename(&version, &platform), "go1.23.1.linux-amd64.tar.gz");
    }
}
