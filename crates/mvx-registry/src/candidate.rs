use mvx_version::Version;

/// A version as reported by an upstream registry, before resolution
/// against a user's spec (spec.md §4.7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCandidate {
    pub version: Version,
    pub lts: bool,
    pub prerelease: bool,
}

impl VersionCandidate {
    pub fn new(version: Version) -> Self {
        let prerelease = version.is_prerelease();
        Self {
            version,
            lts: false,
            prerelease,
        }
    }

    pub fn lts(mut self, lts: bool) -> Self {
        self.lts = lts;
        self
    }
}
