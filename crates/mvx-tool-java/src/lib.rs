//! Eclipse Temurin (and fallback-vendor) adapter backed by the Foojay
//! Disco API (spec.md §4.8).

use async_trait::async_trait;
use mvx_archive::Algorithm;
use mvx_platform::{Arch, Os, Platform};
use mvx_registry::{
    foojay_major_versions, foojay_package_info, foojay_packages, foojay_select_package,
    VersionCandidate, JAVA_DISTRIBUTION_FALLBACK,
};
use mvx_tool::{ChecksumInfo, Tool, ToolConfig, ToolError};
use mvx_version::Version;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct JavaTool {
    client: reqwest::Client,
}

impl JavaTool {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn foojay_os(os: Os) -> &'static str {
        match os {
            Os::Windows => "windows",
            Os::MacOS => "macos",
            Os::Linux => "linux",
            Os::Other => "linux",
        }
    }

    /// Distribution fallback chain used when the requested one has no
    /// matching package (spec.md §4.8).
    async fn resolve_distribution_and_package(
        &self,
        requested: Option<&str>,
        version: &Version,
        platform: &Platform,
    ) -> mvx_tool::Result<(String, mvx_registry::FoojayPackage)> {
        let order: Vec<&str> = match requested {
            Some(d) => std::iter::once(d)
                .chain(JAVA_DISTRIBUTION_FALLBACK.iter().copied().filter(|&x| x != d))
                .collect(),
            None => JAVA_DISTRIBUTION_FALLBACK.to_vec(),
        };

        for distribution in order {
            let packages = foojay_packages(
                &self.client,
                distribution,
                version.as_str(),
                Self::foojay_os(platform.os),
                platform.arch.foojay_str(),
            )
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "java".to_string(),
                message: e.to_string(),
            })?;

            let ga_only = !version.is_prerelease();
            if let Some(pkg) = foojay_select_package(&packages, Self::foojay_os(platform.os), ga_only) {
                return Ok((distribution.to_string(), pkg.clone()));
            }
            debug!("no foojay package for distribution {distribution}, trying next");
        }

        Err(ToolError::VersionResolutionFailed {
            tool: "java".to_string(),
            spec: version.to_string(),
        })
    }

    /// Walk the install tree for a `java`/`java.exe` binary and return its
    /// grandparent as the home dir (spec.md §4.8 macOS detection clause).
    fn detect_home(install_dir: &Path, platform: &Platform) -> Option<PathBuf> {
        let exe = platform.exe_name("java");
        let parent = mvx_platform::find_binary_parent_dir(install_dir, &exe)?;
        parent.parent().map(|p| p.to_path_buf())
    }
}

#[async_trait]
impl Tool for JavaTool {
    fn name(&self) -> &str {
        "java"
    }

    fn display_name(&self) -> &str {
        "Java Development Kit (Eclipse Temurin)"
    }

    fn home_env_var(&self) -> Option<&str> {
        Some("JAVA_HOME")
    }

    async fn list_versions(&self) -> mvx_tool::Result<Vec<VersionCandidate>> {
        foojay_major_versions(&self.client)
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "java".to_string(),
                message: e.to_string(),
            })
    }

    async fn download_url(&self, version: &Version, platform: &Platform, cfg: &ToolConfig) -> mvx_tool::Result<String> {
        let (_, pkg) = self
            .resolve_distribution_and_package(cfg.distribution.as_deref(), version, platform)
            .await?;
        let info = foojay_package_info(&self.client, &pkg.id)
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "java".to_string(),
                message: e.to_string(),
            })?
            .ok_or_else(|| ToolError::VersionResolutionFailed {
                tool: "java".to_string(),
                spec: version.to_string(),
            })?;
        Ok(info.direct_download_uri)
    }

    async fn get_checksum(&self, version: &Version, _filename: &str, cfg: &ToolConfig) -> mvx_tool::Result<Option<ChecksumInfo>> {
        let platform = Platform::current();
        let (_, pkg) = self
            .resolve_distribution_and_package(cfg.distribution.as_deref(), version, &platform)
            .await?;
        let info = foojay_package_info(&self.client, &pkg.id)
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "java".to_string(),
                message: e.to_string(),
            })?;
        Ok(info.and_then(|i| {
            let hex = i.checksum?;
            let algorithm = match i.checksum_type.as_deref() {
                Some("sha512") => Algorithm::Sha512,
                _ => Algorithm::Sha256,
            };
            Some(ChecksumInfo::Inline { hex, algorithm })
        }))
    }

    fn bin_relative_path(&self, _version: &Version, platform: &Platform) -> PathBuf {
        match platform.os {
            Os::MacOS => PathBuf::from("Contents/Home/bin"),
            _ => PathBuf::from("bin"),
        }
    }

    fn home_relative_path(&self, _version: &Version, platform: &Platform) -> PathBuf {
        match platform.os {
            Os::MacOS => PathBuf::from("Contents/Home"),
            _ => PathBuf::from("."),
        }
    }

    async fn verify(&self, install_dir: &Path, version: &Version, platform: &Platform) -> mvx_tool::Result<bool> {
        let home = Self::detect_home(install_dir, platform).unwrap_or_else(|| install_dir.to_path_buf());
        let exe = home.join("bin").join(platform.exe_name("java"));
        if !exe.exists() {
            warn!("java binary not found under {}", install_dir.display());
            return Ok(false);
        }

        let output = tokio::process::Command::new(&exe)
            .arg("-version")
            .output()
            .await
            .map_err(|e| ToolError::ConfigurationError {
                tool: "java".to_string(),
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
    fn foojay_os_mapping() {
        assert_eq!(JavaTool::foojay_os(Os::MacOS), "macos");
        assert_eq!(JavaTool::foojay_os(Os::Linux), "linux");
        assert_eq!(JavaTool::foojay_os(Os::Windows), "windows");
    }

    #[test]
    fn bin_relative_path_differs_on_macos() {
        let tool = JavaTool::new(reqwest::Client::new());
        let version: Version = "21.0.4".parse().unwrap();
        let mac = Platform {
            os: Os::MacOS,
            arch: Arch::Arm64,
            libc: mvx_platform::Libc::Gnu,
        };
        let linux = Platform {
            os: Os::Linux,
            arch: Arch::Amd64,
            libc: mvx_platform::Libc::Gnu,
        };
        assert_eq!(tool.bin_relative_path(&version, &mac), PathBuf::from("Contents/Home/bin"));
        assert_eq!(tool.bin_relative_path(&version, &linux), PathBuf::from("bin"));
    }
}
