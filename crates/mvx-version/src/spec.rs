//! `VersionSpec`: the tagged value a user-supplied version string parses
//! into, and its matching/resolution rules (spec.md §3, §4.6, §8).

use crate::error::VersionError;
use crate::version::Version;
use serde::{Deserialize, Serialize};

/// Inclusivity of a range bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound {
    Inclusive,
    Exclusive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VersionSpec {
    Exact(Version),
    Range {
        lower: Version,
        upper: Version,
        lower_bound: Bound,
        upper_bound: Bound,
    },
    Latest,
    Lts,
    MajorOnly(u64),
    MajorMinor(u64, u64),
}

impl VersionSpec {
    /// Parse a user-supplied spec string.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "latest" => return Ok(VersionSpec::Latest),
            "lts" => return Ok(VersionSpec::Lts),
            _ => {}
        }

        // Major-only: a bare non-negative integer with no dots/dashes.
        if !trimmed.is_empty()
            && trimmed.chars().all(|c| c.is_ascii_digit())
        {
            let major: u64 = trimmed
                .parse()
                .map_err(|_| VersionError::InvalidSpec(input.to_string()))?;
            return Ok(VersionSpec::MajorOnly(major));
        }

        // Major.minor: exactly two dot-separated non-negative integers.
        if let Some((maj, min)) = trimmed.split_once('.') {
            if !min.contains('.')
                && maj.chars().all(|c| c.is_ascii_digit())
                && min.chars().all(|c| c.is_ascii_digit())
                && !maj.is_empty()
                && !min.is_empty()
            {
                let major: u64 = maj
                    .parse()
                    .map_err(|_| VersionError::InvalidSpec(input.to_string()))?;
                let minor: u64 = min
                    .parse()
                    .map_err(|_| VersionError::InvalidSpec(input.to_string()))?;
                return Ok(VersionSpec::MajorMinor(major, minor));
            }
        }

        // Range syntax: "lower..upper" or "lower..=upper".
        if let Some(idx) = trimmed.find("..") {
            let (lower_str, rest) = trimmed.split_at(idx);
            let rest = &rest[2..];
            let (upper_bound, upper_str) = if let Some(stripped) = rest.strip_prefix('=') {
                (Bound::Inclusive, stripped)
            } else {
                (Bound::Exclusive, rest)
            };
            let lower: Version = lower_str
                .parse()
                .map_err(|_| VersionError::InvalidSpec(input.to_string()))?;
            let upper: Version = upper_str
                .parse()
                .map_err(|_| VersionError::InvalidSpec(input.to_string()))?;
            return Ok(VersionSpec::Range {
                lower,
                upper,
                lower_bound: Bound::Inclusive,
                upper_bound,
            });
        }

        // Fall back to an exact version (covers "3.9.6", "4.0.0-rc-4", "22-ea").
        let exact: Version = trimmed
            .parse()
            .map_err(|_| VersionError::InvalidSpec(input.to_string()))?;
        Ok(VersionSpec::Exact(exact))
    }

    /// Does `version` satisfy this spec? `Latest`/`Lts` require the caller
    /// to have already filtered the candidate list appropriately (they
    /// match everything here; callers use `resolve` for those two kinds).
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionSpec::Exact(v) => v == version,
            VersionSpec::Range {
                lower,
                upper,
                lower_bound,
                upper_bound,
            } => {
                let lower_ok = match lower_bound {
                    Bound::Inclusive => version >= lower,
                    Bound::Exclusive => version > lower,
                };
                let upper_ok = match upper_bound {
                    Bound::Inclusive => version <= upper,
                    Bound::Exclusive => version < upper,
                };
                lower_ok && upper_ok
            }
            VersionSpec::Latest => true,
            VersionSpec::Lts => true,
            VersionSpec::MajorOnly(m) => version.major() == *m,
            VersionSpec::MajorMinor(maj, min) => version.major() == *maj && version.minor() == *min,
        }
    }

    /// Resolve against a list of candidates, picking the highest match.
    /// `lts_flags[i]` must align with `candidates[i]` and is consulted only
    /// for `VersionSpec::Lts`.
    pub fn resolve<'a>(
        &self,
        candidates: &'a [Version],
        lts_flags: &[bool],
    ) -> Result<&'a Version, VersionError> {
        let spec_key = format!("{:?}", self);
        let filtered: Vec<&Version> = match self {
            VersionSpec::Latest => candidates.iter().filter(|v| !v.is_prerelease()).collect(),
            VersionSpec::Lts => candidates
                .iter()
                .enumerate()
                .filter(|(i, v)| lts_flags.get(*i).copied().unwrap_or(false) && !v.is_prerelease())
                .map(|(_, v)| v)
                .collect(),
            _ => candidates.iter().filter(|v| self.matches(v)).collect(),
        };

        filtered
            .into_iter()
            .max()
            .ok_or(VersionError::NoMatch { spec: spec_key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn parses_keywords() {
        assert_eq!(VersionSpec::parse("latest").unwrap(), VersionSpec::Latest);
        assert_eq!(VersionSpec::parse("LTS").unwrap(), VersionSpec::Lts);
    }

    #[test]
    fn parses_major_only() {
        assert_eq!(VersionSpec::parse("21").unwrap(), VersionSpec::MajorOnly(21));
    }

    #[test]
    fn parses_major_minor() {
        assert_eq!(
            VersionSpec::parse("3.9").unwrap(),
            VersionSpec::MajorMinor(3, 9)
        );
    }

    #[test]
    fn parses_exact() {
        assert_eq!(
            VersionSpec::parse("4.0.0-rc-4").unwrap(),
            VersionSpec::Exact(v("4.0.0-rc-4"))
        );
    }

    #[test]
    fn resolve_major_minor_picks_highest_patch() {
        let candidates = vec![v("3.9.4"), v("3.9.11"), v("3.9.6"), v("3.8.8")];
        let spec = VersionSpec::parse("3.9").unwrap();
        let resolved = spec.resolve(&candidates, &[]).unwrap();
        assert_eq!(resolved, &v("3.9.11"));
    }

    #[test]
    fn resolve_latest_skips_prerelease() {
        let candidates = vec![v("22.0.0"), v("22.1.0-ea")];
        let resolved = VersionSpec::Latest.resolve(&candidates, &[]).unwrap();
        assert_eq!(resolved, &v("22.0.0"));
    }

    #[test]
    fn resolve_lts_requires_flag() {
        let candidates = vec![v("20.17.0"), v("21.5.0")];
        let flags = vec![true, false];
        let resolved = VersionSpec::Lts.resolve(&candidates, &flags).unwrap();
        assert_eq!(resolved, &v("20.17.0"));
    }

    #[test]
    fn resolve_no_match_errors() {
        let candidates = vec![v("1.0.0")];
        let spec = VersionSpec::parse("2").unwrap();
        assert!(spec.resolve(&candidates, &[]).is_err());
    }

    #[test]
    fn range_matches_inclusive_lower_exclusive_upper() {
        let spec = VersionSpec::parse("1.0.0..2.0.0").unwrap();
        assert!(spec.matches(&v("1.0.0")));
        assert!(spec.matches(&v("1.9.9")));
        assert!(!spec.matches(&v("2.0.0")));
    }

    #[test]
    fn range_inclusive_upper_with_eq_syntax() {
        let spec = VersionSpec::parse("1.0.0..=2.0.0").unwrap();
        assert!(spec.matches(&v("2.0.0")));
    }
}
