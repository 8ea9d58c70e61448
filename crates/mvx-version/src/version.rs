//! `Version`: an ordered, vendor-tolerant version value.
//!
//! Total order (spec.md §3): numeric components compare ascending
//! left-to-right (missing trailing components treated as 0); a release
//! (no prerelease tail) always outranks a prerelease with equal numeric
//! components; two prereleases with equal numerics tie-break
//! lexicographically on the prerelease tag.

use crate::error::VersionError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<nums>[0-9]+(?:\.[0-9]+)*)(?:[-+](?P<pre>[A-Za-z0-9.-]+))?$").unwrap()
});

/// An ordered version value: dotted numeric components plus an optional
/// prerelease tail (`-ea`, `-rc-1`, `-m3`, `+12`).
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct Version {
    components: Vec<u64>,
    prerelease: Option<String>,
    raw: String,
}

impl Version {
    /// Numeric components, e.g. `[21, 0, 4]` for `"21.0.4"`.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// The first numeric component ("major"), used for Java-style
    /// major-only spec matching.
    pub fn major(&self) -> u64 {
        self.components.first().copied().unwrap_or(0)
    }

    pub fn minor(&self) -> u64 {
        self.components.get(1).copied().unwrap_or(0)
    }

    /// Original string as parsed, preserved verbatim for display/URLs.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Java's legacy `1.x` major-version folding: `"1.8"` means major `8`.
    /// This is a Java-specific normalization applied by the Java adapter
    /// before calling `Version::parse`, not baked into the generic parser
    /// (other tools never use this scheme).
    pub fn fold_java_legacy_major(input: &str) -> std::borrow::Cow<'_, str> {
        if let Some(rest) = input.strip_prefix("1.") {
            if rest
                .chars()
                .next()
                .map(|c| c.is_ascii_digit())
                .unwrap_or(false)
            {
                return std::borrow::Cow::Owned(rest.to_string());
            }
        }
        std::borrow::Cow::Borrowed(input)
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('v');
        let caps = VERSION_RE
            .captures(trimmed)
            .ok_or_else(|| VersionError::InvalidVersion(s.to_string()))?;

        let components: Vec<u64> = caps["nums"]
            .split('.')
            .map(|c| c.parse::<u64>().unwrap())
            .collect();
        let prerelease = caps.name("pre").map(|m| m.as_str().to_string());

        Ok(Version {
            components,
            prerelease,
            raw: s.to_string(),
        })
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                other_ord => return other_ord,
            }
        }
        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("3.9.6", "3.9.6", Ordering::Equal)]
    #[case("3.9.6", "3.9.10", Ordering::Less)]
    #[case("3.10.0", "3.9.10", Ordering::Greater)]
    #[case("4.0.0-rc-4", "4.0.0", Ordering::Less)]
    #[case("4.0.0", "4.0.0-rc-4", Ordering::Greater)]
    #[case("22-ea", "22-rc-1", Ordering::Less)]
    #[case("1.2", "1.2.0", Ordering::Equal)]
    fn total_order(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        let va: Version = a.parse().unwrap();
        let vb: Version = b.parse().unwrap();
        assert_eq!(va.cmp(&vb), expected, "{a} vs {b}");
    }

    #[test]
    fn parse_strips_leading_v() {
        let v: Version = "v20.17.0".parse().unwrap();
        assert_eq!(v.components(), &[20, 17, 0]);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("not-a-version".parse::<Version>().is_err());
    }

    #[test]
    fn java_legacy_major_folding() {
        assert_eq!(Version::fold_java_legacy_major("1.8"), "8");
        assert_eq!(Version::fold_java_legacy_major("1.8.0_292"), "8.0_292");
        assert_eq!(Version::fold_java_legacy_major("21"), "21");
    }

    #[test]
    fn major_and_minor_accessors() {
        let v: Version = "21.0.4".parse().unwrap();
        assert_eq!(v.major(), 21);
        assert_eq!(v.minor(), 0);
    }

    #[test]
    fn sort_idempotent_and_stable() {
        let mut versions: Vec<Version> = ["1.2.3", "1.10.0", "1.2.0"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        versions.sort();
        let sorted_once: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        versions.sort();
        let sorted_twice: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        assert_eq!(sorted_once, sorted_twice);
        assert_eq!(sorted_once, vec!["1.2.0", "1.2.3", "1.10.0"]);
    }
}
