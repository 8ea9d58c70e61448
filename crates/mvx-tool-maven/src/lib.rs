//! Apache Maven adapter: HTML directory listing for version discovery,
//! `.sha512` sibling checksum (spec.md §4.8).

use async_trait::async_trait;
use mvx_archive::Algorithm;
use mvx_platform::Platform;
use mvx_registry::{fetch_apache_index, VersionCandidate};
use mvx_tool::{ChecksumInfo, Tool, ToolConfig, ToolError};
use mvx_version::Version;
use std::path::{Path, PathBuf};

const INDEX_URL: &str = "https://dlcdn.apache.org/maven/maven-3/";
const DOWNLOAD_HOST: &str = "https://dlcdn.apache.org/maven/maven-3";
const CHECKSUM_HOST: &str = "https://downloads.apache.org/maven/maven-3";

const FALLBACK_VERSIONS: &[&str] = &["3.9.9", "3.9.6", "3.8.8"];

pub struct MavenTool {
    client: reqwest::Client,
}

impl MavenTool {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn archive_filename(version: &Version) -> String {
        format!("apache-maven-{version}-bin.tar.gz")
    }
}

#[async_trait]
impl Tool for MavenTool {
    fn name(&self) -> &str {
        "maven"
    }

    fn display_name(&self) -> &str {
        "Apache Maven"
    }

    fn home_env_var(&self) -> Option<&str> {
        Some("MAVEN_HOME")
    }

    async fn list_versions(&self) -> mvx_tool::Result<Vec<VersionCandidate>> {
        fetch_apache_index(&self.client, INDEX_URL, FALLBACK_VERSIONS)
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "maven".to_string(),
                message: e.to_string(),
            })
    }

    async fn download_url(&self, version: &Version, _platform: &Platform, _cfg: &ToolConfig) -> mvx_tool::Result<String> {
        Ok(format!(
            "{DOWNLOAD_HOST}/{version}/binaries/{}",
            Self::archive_filename(version)
        ))
    }

    async fn get_checksum(&self, version: &Version, filename: &str, _cfg: &ToolConfig) -> mvx_tool::Result<Option<ChecksumInfo>> {
        let _ = filename;
        let url = format!(
            "{CHECKSUM_HOST}/{version}/binaries/{}.sha512",
            Self::archive_filename(version)
        );
        let response = self.client.get(&url).send().await.map_err(|e| ToolError::ConfigurationError {
            tool: "maven".to_string(),
            message: e.to_string(),
        })?;
        if !response.status().is_success() {
            return Ok(None);
        }
        let body = response.text().await.map_err(|e| ToolError::ConfigurationError {
            tool: "maven".to_string(),
            message: e.to_string(),
        })?;
        // Apache's .sha512 sidecar body is the raw hex digest, sometimes
        // followed by whitespace or the filename on newer mirrors.
        let hex = body.split_whitespace().next().unwrap_or_default().to_string();
        if hex.is_empty() {
            return Ok(None);
        }
        Ok(Some(ChecksumInfo::Inline {
            hex,
            algorithm: Algorithm::Sha512,
        }))
    }

    // The archive's single top-level directory (`apache-maven-{version}/`)
    // is stripped during extraction (spec.md §4.3.5), so the install dir's
    // layout is flat: `bin/` sits directly under it.
    fn bin_relative_path(&self, _version: &Version, _platform: &Platform) -> PathBuf {
        PathBuf::from("bin")
    }

    fn home_relative_path(&self, _version: &Version, _platform: &Platform) -> PathBuf {
        PathBuf::from(".")
    }

    async fn verify(&self, install_dir: &Path, version: &Version, platform: &Platform) -> mvx_tool::Result<bool> {
        let exe = install_dir
            .join(self.bin_relative_path(version, platform))
            .join(platform.script_name("mvn"));
        let exe = if exe.exists() {
            exe
        } else {
            install_dir.join(self.bin_relative_path(version, platform)).join("mvn")
        };
        if !exe.exists() {
            return Ok(false);
        }
        let output = tokio::process::Command::new(&exe)
            .arg("--version")
            .output()
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "maven".to_string(),
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
