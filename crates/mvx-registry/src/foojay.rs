//! Foojay Disco API client for Java distributions (spec.md §4.7, §4.8).

use crate::candidate::VersionCandidate;
use crate::error::{RegistryError, Result};
use mvx_version::Version;
use serde::Deserialize;
use tracing::warn;

const DISCO_BASE: &str = "https://api.foojay.io/disco/v3.0";

/// Distributions tried, in order, when the caller's requested
/// distribution is unavailable (spec.md §4.8).
pub const DISTRIBUTION_FALLBACK: &[&str] = &["temurin", "zulu", "microsoft", "corretto"];

#[derive(Debug, Deserialize)]
struct MajorVersionsResponse {
    result: Vec<MajorVersionEntry>,
}

#[derive(Debug, Deserialize)]
struct MajorVersionEntry {
    major_version: u64,
    #[serde(default)]
    maintained: bool,
    #[serde(default)]
    term_of_support: Option<String>,
}

/// A Foojay package entry (from `/packages`).
#[derive(Debug, Clone, Deserialize)]
pub struct Package {
    pub id: String,
    pub filename: String,
    pub java_version: String,
    pub archive_type: String,
    pub operating_system: String,
    pub lib_c_type: Option<String>,
    pub release_status: String,
}

#[derive(Debug, Deserialize)]
struct PackagesResponse {
    result: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct PackageInfoResponse {
    result: Vec<PackageInfo>,
}

#[derive(Debug, Deserialize)]
pub struct PackageInfo {
    pub checksum: Option<String>,
    pub checksum_type: Option<String>,
    pub direct_download_uri: String,
}

/// Built-in fallback list used when the Disco API is unreachable. Kept
/// intentionally small: just enough LTS lines for an offline-capable
/// default.
fn fallback_major_versions() -> Vec<VersionCandidate> {
    [(8, true), (11, true), (17, true), (21, true), (23, false)]
        .into_iter()
        .map(|(major, lts): (u64, bool)| {
            VersionCandidate::new(major.to_string().parse().expect("plain integer parses")).lts(lts)
        })
        .collect()
}

pub async fn list_major_versions(client: &reqwest::Client) -> Result<Vec<VersionCandidate>> {
    let url = format!("{DISCO_BASE}/major_versions?maintained=true");
    let response = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!("foojay major_versions request failed: {e}, using fallback list");
            return Ok(fallback_major_versions());
        }
    };

    if !response.status().is_success() {
        warn!("foojay major_versions returned {}, using fallback list", response.status());
        return Ok(fallback_major_versions());
    }

    let body: MajorVersionsResponse = response.json().await.map_err(|e| RegistryError::Parse {
        source: url.clone(),
        reason: e.to_string(),
    })?;

    Ok(body
        .result
        .into_iter()
        .filter(|e| e.maintained)
        .map(|e| {
            let lts = e.term_of_support.as_deref() == Some("LTS");
            let version: Version = e.major_version.to_string().parse().expect("plain integer parses");
            VersionCandidate::new(version).lts(lts)
        })
        .collect())
}

/// Package selection priority (spec.md §4.8): Linux glibc tar.gz, then
/// Linux musl tar.gz, then any tar.gz, then zip, then anything else.
pub fn select_package<'a>(packages: &'a [Package], os: &str, ga_only: bool) -> Option<&'a Package> {
    let candidates: Vec<&Package> = packages
        .iter()
        .filter(|p| p.operating_system == os)
        .filter(|p| !ga_only || p.release_status == "ga")
        .collect();

    let rank = |p: &&Package| -> u8 {
        let is_tar_gz = p.filename.ends_with(".tar.gz");
        let is_zip = p.filename.ends_with(".zip");
        let is_glibc = p.lib_c_type.as_deref() == Some("glibc");
        let is_musl = p.lib_c_type.as_deref() == Some("musl");
        if os == "linux" && is_glibc && is_tar_gz {
            0
        } else if os == "linux" && is_musl && is_tar_gz {
            1
        } else if is_tar_gz {
            2
        } else if is_zip {
            3
        } else {
            4
        }
    };

    candidates.into_iter().min_by_key(|p| rank(p))
}

pub async fn list_packages(
    client: &reqwest::Client,
    distribution: &str,
    version: &str,
    os: &str,
    arch: &str,
) -> Result<Vec<Package>> {
    let url = format!(
        "{DISCO_BASE}/packages?distro={distribution}&version={version}&operating_system={os}&architecture={arch}&archive_type=tar.gz,zip"
    );
    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Ok(Vec::new());
    }
    let body: PackagesResponse = response.json().await.map_err(|e| RegistryError::Parse {
        source: url,
        reason: e.to_string(),
    })?;
    Ok(body.result)
}

pub async fn package_info(client: &reqwest::Client, package_id: &str) -> Result<Option<PackageInfo>> {
    let url = format!("{DISCO_BASE}/ids/{package_id}");
    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Ok(None);
    }
    let body: PackageInfoResponse = response.json().await.map_err(|e| RegistryError::Parse {
        source: url,
        reason: e.to_string(),
    })?;
    Ok(body.result.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(os: &str, libc: Option<&str>, filename: &str, status: &str) -> Package {
        Package {
            id: "x".to_string(),
            filename: filename.to_string(),
            java_version: "21".to_string(),
            archive_type: "tar.gz".to_string(),
            operating_system: os.to_string(),
            lib_c_type: libc.map(str::to_string),
            release_status: status.to_string(),
        }
    }

    #[test]
    fn prefers_linux_glibc_tar_gz() {
        let packages = vec![
            pkg("linux", Some("musl"), "jdk-21-musl.tar.gz", "ga"),
            pkg("linux", Some("glibc"), "jdk-21-glibc.tar.gz", "ga"),
            pkg("linux", None, "jdk-21.zip", "ga"),
        ];
        let chosen = select_package(&packages, "linux", true).unwrap();
        assert_eq!(chosen.filename, "jdk-21-glibc.tar.gz");
    }

    #[test]
    fn falls_back_to_musl_when_no_glibc() {
        let packages = vec![
            pkg("linux", Some("musl"), "jdk-21-musl.tar.gz", "ga"),
            pkg("linux", None, "jdk-21.zip", "ga"),
        ];
        let chosen = select_package(&packages, "linux", true).unwrap();
        assert_eq!(chosen.filename, "jdk-21-musl.tar.gz");
    }

    #[test]
    fn ga_only_filters_early_access() {
        let packages = vec![pkg("linux", Some("glibc"), "jdk-22-ea.tar.gz", "ea")];
        assert!(select_package(&packages, "linux", true).is_none());
    }

    #[test]
    fn distribution_fallback_order() {
        assert_eq!(DISTRIBUTION_FALLBACK[0], "temurin");
        assert_eq!(DISTRIBUTION_FALLBACK.last(), Some(&"corretto"));
    }
}
