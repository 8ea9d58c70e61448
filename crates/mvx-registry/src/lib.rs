//! Per-upstream version discovery, with built-in fallback lists for
//! when an upstream is unreachable (spec.md §4.7).

mod apache;
mod candidate;
mod error;
mod foojay;
mod go;
mod node;

pub use apache::{fetch_index as fetch_apache_index, parse_index as parse_apache_index};
pub use candidate::VersionCandidate;
pub use error::{RegistryError, Result};
pub use foojay::{list_major_versions as foojay_major_versions, list_packages as foojay_packages, package_info as foojay_package_info, select_package as foojay_select_package, Package as FoojayPackage, PackageInfo as FoojayPackageInfo, DISTRIBUTION_FALLBACK as JAVA_DISTRIBUTION_FALLBACK};
pub use go::{checksum_for_filename as go_checksum_for_filename, list_versions as go_versions};
pub use node::list_versions as node_versions;

/// Default timeout applied to a shared registry HTTP client (spec.md §4.7).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Build the HTTP client shared across registry calls.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
}
