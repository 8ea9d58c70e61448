//! Version parsing, ordering and spec resolution.
//!
//! `Version` gives a total order over the vendor-specific version schemes
//! this engine has to compare (dotted numerics, optional prerelease tails).
//! `VersionSpec` is the tagged value a user-supplied string (`"21"`,
//! `"3.9"`, `"latest"`, `"lts"`, `"4.0.0-rc-4"`) parses into.

mod error;
mod spec;
mod version;

pub use error::VersionError;
pub use spec::VersionSpec;
pub use version::Version;

/// Sort candidates using the total order (descending: newest first), the
/// convention spec.md §4.6 asks for when presenting a list to a caller.
pub fn sort_descending(versions: &mut [Version]) {
    versions.sort_by(|a, b| b.cmp(a));
}

/// Sort candidates ascending, used internally by resolution (`highest
/// matching` is just `.last()` of the ascending sort).
pub fn sort_ascending(versions: &mut [Version]) {
    versions.sort();
}

#[cfg(test)]
mod sort_tests {
    use super::*;

    #[test]
    fn sort_is_idempotent() {
        let mut versions: Vec<Version> = ["1.2.3", "1.10.0", "1.2.0", "2.0.0-rc-1", "2.0.0"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        sort_descending(&mut versions);
        let once = versions.clone();
        sort_descending(&mut versions);
        assert_eq!(once, versions);
    }
}
