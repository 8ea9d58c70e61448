//! Node.js adapter: `.tar.gz` on Unix, `.zip` on Windows; checksum parsed
//! from `SHASUMS256.txt` (spec.md §4.8).

use async_trait::async_trait;
use mvx_archive::Algorithm;
use mvx_platform::{Os, Platform};
use mvx_registry::{node_versions, VersionCandidate};
use mvx_tool::{ChecksumInfo, Tool, ToolConfig, ToolError};
use mvx_version::Version;
use std::path::{Path, PathBuf};

const DIST_BASE: &str = "https://nodejs.org/dist";

pub struct NodeTool {
    client: reqwest::Client,
}

impl NodeTool {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn platform_tag(platform: &Platform) -> String {
        let os = match platform.os {
            Os::Windows => "win",
            Os::MacOS => "darwin",
            _ => "linux",
        };
        format!("{os}-{}", platform.arch.node_str())
    }

    fn archive_filename(version: &Version, platform: &Platform) -> String {
        let ext = if platform.os == Os::Windows { "zip" } else { "tar.gz" };
        format!("node-v{version}-{}.{ext}", Self::platform_tag(platform))
    }
}

#[async_trait]
impl Tool for NodeTool {
    fn name(&self) -> &str {
        "node"
    }

    fn display_name(&self) -> &str {
        "Node.js"
    }

    fn home_env_var(&self) -> Option<&str> {
        Some("NODE_HOME")
    }

    async fn list_versions(&self) -> mvx_tool::Result<Vec<VersionCandidate>> {
        node_versions(&self.client).await.map_err(|e| ToolError::ConfigurationError {
            tool: "node".to_string(),
            message: e.to_string(),
        })
    }

    async fn download_url(&self, version: &Version, platform: &Platform, _cfg: &ToolConfig) -> mvx_tool::Result<String> {
        Ok(format!(
            "{DIST_BASE}/v{version}/{}",
            Self::archive_filename(version, platform)
        ))
    }

    async fn get_checksum(&self, version: &Version, filename: &str, _cfg: &ToolConfig) -> mvx_tool::Result<Option<ChecksumInfo>> {
        let _ = filename;
        Ok(Some(ChecksumInfo::SiblingUrl {
            url: format!("{DIST_BASE}/v{version}/SHASUMS256.txt"),
            algorithm: Algorithm::Sha256,
        }))
    }

    fn bin_relative_path(&self, _version: &Version, platform: &Platform) -> PathBuf {
        if platform.os == Os::Windows {
            PathBuf::new()
        } else {
            PathBuf::from("bin")
        }
    }

    async fn verify(&self, install_dir: &Path, version: &Version, platform: &Platform) -> mvx_tool::Result<bool> {
        let exe = install_dir
            .join(self.bin_relative_path(version, platform))
            .join(platform.exe_name("node"));
        if !exe.exists() {
            return Ok(false);
        }
        let output = tokio::process::Command::new(&exe)
            .arg("--version")
            .output()
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "node".to_string(),
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
