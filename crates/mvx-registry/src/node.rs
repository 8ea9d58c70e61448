//! Node.js `index.json` registry client (spec.md §4.7).

use crate::candidate::VersionCandidate;
use crate::error::{RegistryError, Result};
use mvx_version::Version;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

const INDEX_URL: &str = "https://nodejs.org/dist/index.json";

#[derive(Debug, Deserialize)]
struct Entry {
    version: String,
    lts: Value,
}

/// `lts` is either `false` or a truthy codename string (spec.md §4.7, §9).
fn lts_codename(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(false) | Value::Null => None,
        other => {
            warn!("unexpected node lts field shape: {other:?}");
            None
        }
    }
}

fn fallback_versions() -> Vec<VersionCandidate> {
    [("20.17.0", true), ("22.9.0", false), ("18.20.4", true)]
        .into_iter()
        .filter_map(|(v, lts)| v.parse::<Version>().ok().map(|v| VersionCandidate::new(v).lts(lts)))
        .collect()
}

pub async fn list_versions(client: &reqwest::Client) -> Result<Vec<VersionCandidate>> {
    let response = match client.get(INDEX_URL).send().await {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            warn!("node index.json returned {}, using fallback list", r.status());
            return Ok(fallback_versions());
        }
        Err(e) => {
            warn!("node index.json request failed: {e}, using fallback list");
            return Ok(fallback_versions());
        }
    };

    let entries: Vec<Entry> = response.json().await.map_err(|e| RegistryError::Parse {
        source: INDEX_URL.to_string(),
        reason: e.to_string(),
    })?;

    Ok(entries
        .into_iter()
        .filter_map(|e| {
            let stripped = e.version.trim_start_matches('v');
            let version: Version = stripped.parse().ok()?;
            let codename = lts_codename(&e.lts);
            Some(VersionCandidate::new(version).lts(codename.is_some()))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lts_false_means_no_codename() {
        assert_eq!(lts_codename(&Value::Bool(false)), None);
    }

    #[test]
    fn lts_string_is_the_codename() {
        assert_eq!(lts_codename(&Value::String("Iron".to_string())), Some("Iron".to_string()));
    }

    #[test]
    fn fallback_list_is_nonempty() {
        assert!(!fallback_versions().is_empty());
    }
}
