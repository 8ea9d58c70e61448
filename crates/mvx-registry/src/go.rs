//! Go distribution list registry client (spec.md §4.7).

use crate::candidate::VersionCandidate;
use crate::error::{RegistryError, Result};
use mvx_version::Version;
use serde::Deserialize;
use tracing::warn;

const DL_URL: &str = "https://go.dev/dl/?mode=json&include=all";

#[derive(Debug, Deserialize)]
struct Release {
    version: String,
    stable: bool,
    #[serde(default)]
    files: Vec<ReleaseFile>,
}

#[derive(Debug, Clone, Deserialize)]
struct ReleaseFile {
    filename: String,
    sha256: String,
}

fn fallback_versions() -> Vec<VersionCandidate> {
    ["1.23.1", "1.22.7", "1.21.13"]
        .into_iter()
        .filter_map(|v| v.parse::<Version>().ok())
        .map(VersionCandidate::new)
        .collect()
}

pub async fn list_versions(client: &reqwest::Client) -> Result<Vec<VersionCandidate>> {
    let response = match client.get(DL_URL).send().await {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            warn!("go dist list returned {}, using fallback list", r.status());
            return Ok(fallback_versions());
        }
        Err(e) => {
            warn!("go dist list request failed: {e}, using fallback list");
            return Ok(fallback_versions());
        }
    };

    let releases: Vec<Release> = response.json().await.map_err(|e| RegistryError::Parse {
        source: DL_URL.to_string(),
        reason: e.to_string(),
    })?;

    Ok(releases
        .into_iter()
        .filter(|r| r.stable)
        .filter_map(|r| {
            // Go's own versions are prefixed "go1.23.1".
            let stripped = r.version.strip_prefix("go")?;
            let version: Version = stripped.parse().ok()?;
            Some(VersionCandidate::new(version))
        })
        .collect())
}

/// Fetch the sha256 for a specific release filename from the dist JSON
/// (Go publishes checksums inline rather than via a sidecar file).
pub async fn checksum_for_filename(client: &reqwest::Client, filename: &str) -> Result<Option<String>> {
    let response = client.get(DL_URL).send().await?;
    if !response.status().is_success() {
        return Ok(None);
    }
    let releases: Vec<Release> = response.json().await.map_err(|e| RegistryError::Parse {
        source: DL_URL.to_string(),
        reason: e.to_string(),
    })?;
    Ok(releases
        .into_iter()
        .flat_map(|r| r.files)
        .find(|f| f.filename == filename)
        .map(|f| f.sha256))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_list_parses() {
        let fallback = fallback_versions();
        assert_eq!(fallback.len(), 3);
    }
}
