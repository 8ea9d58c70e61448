//! Checksum verification and archive extraction.
//!
//! Two independent concerns that installers lean on together: verifying a
//! downloaded file's digest against a published checksum, then unpacking
//! it safely into an install directory.

mod checksum;
mod error;
mod extract;

pub use checksum::{
    digest_file, find_checksum, parse_checksum_listing, verify_file, Algorithm, ChecksumEntry,
};
pub use error::{ArchiveError, Result};
pub use extract::{extract, Format};
