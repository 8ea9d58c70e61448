//! Apache directory-listing parser for Maven and Maven Daemon (spec.md §4.7).

use crate::candidate::VersionCandidate;
use crate::error::{RegistryError, Result};
use mvx_version::Version;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static HREF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="([^"/?][^"]*)/"#).unwrap());

const EXCLUDED: &[&str] = &["KEYS", "archetype-catalog.xml", "maven-metadata.xml"];

/// Is `name` shaped like a version directory entry? Starts with a digit,
/// contains a `.` or `-`, and isn't one of the known non-version entries.
fn looks_like_version(name: &str) -> bool {
    if EXCLUDED.contains(&name) {
        return false;
    }
    let starts_with_digit = name.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false);
    starts_with_digit && (name.contains('.') || name.contains('-'))
}

/// Parse an Apache-style HTML directory index into version candidates.
pub fn parse_index(html: &str) -> Vec<VersionCandidate> {
    HREF_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let name = cap.get(1)?.as_str();
            if !looks_like_version(name) {
                return None;
            }
            name.parse::<Version>().ok().map(VersionCandidate::new)
        })
        .collect()
}

pub async fn fetch_index(
    client: &reqwest::Client,
    index_url: &str,
    fallback: &[&str],
) -> Result<Vec<VersionCandidate>> {
    let response = match client.get(index_url).send().await {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            warn!("apache index {index_url} returned {}, using fallback list", r.status());
            return Ok(parse_fallback(fallback));
        }
        Err(e) => {
            warn!("apache index {index_url} request failed: {e}, using fallback list");
            return Ok(parse_fallback(fallback));
        }
    };

    let body = response.text().await.map_err(RegistryError::Http)?;
    Ok(parse_index(&body))
}

fn parse_fallback(versions: &[&str]) -> Vec<VersionCandidate> {
    versions
        .iter()
        .filter_map(|v| v.parse::<Version>().ok())
        .map(VersionCandidate::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_INDEX: &str = r#"
        <html><body>
        <a href="../">../</a>
        <a href="KEYS">KEYS</a>
        <a href="3.9.6/">3.9.6/</a>
        <a href="3.9.4/">3.9.4/</a>
        <a href="maven-metadata.xml">maven-metadata.xml</a>
        <a href="archetype-catalog.xml">archetype-catalog.xml</a>
        </body></html>
    "#;

    #[test]
    fn parses_version_directories_only() {
        let candidates = parse_index(SAMPLE_INDEX);
        let versions: Vec<String> = candidates.iter().map(|c| c.version.to_string()).collect();
        assert_eq!(versions, vec!["3.9.6".to_string(), "3.9.4".to_string()]);
    }

    #[test]
    fn excludes_known_non_version_entries() {
        assert!(!looks_like_version("KEYS"));
        assert!(!looks_like_version("maven-metadata.xml"));
        assert!(!looks_like_version("archetype-catalog.xml"));
    }

    #[test]
    fn accepts_dash_separated_version() {
        assert!(looks_like_version("1.0-alpha-1"));
    }
}
