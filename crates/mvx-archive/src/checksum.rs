//! Checksum computation and checksum-file parsing (spec.md §4.4).

use crate::error::{ArchiveError, Result};
use sha2::{Digest, Sha256, Sha512};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Sha256,
    Sha512,
}

impl Algorithm {
    /// Guess the algorithm from a checksum's hex length.
    pub fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            64 => Some(Algorithm::Sha256),
            128 => Some(Algorithm::Sha512),
            _ => None,
        }
    }
}

/// Compute the hex digest of a file on disk.
pub fn digest_file(path: &Path, algorithm: Algorithm) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut buf = [0u8; 64 * 1024];

    let hex = match algorithm {
        Algorithm::Sha256 => {
            let mut hasher = Sha256::new();
            loop {
                let n = reader.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            hex_encode(&hasher.finalize())
        }
        Algorithm::Sha512 => {
            let mut hasher = Sha512::new();
            loop {
                let n = reader.read(&mut buf)?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            hex_encode(&hasher.finalize())
        }
    };
    Ok(hex)
}

/// Verify a downloaded file against an expected hex digest (case-insensitive).
pub fn verify_file(path: &Path, expected_hex: &str, algorithm: Algorithm) -> Result<()> {
    let actual = digest_file(path, algorithm)?;
    if actual.eq_ignore_ascii_case(expected_hex) {
        Ok(())
    } else {
        Err(ArchiveError::ChecksumMismatch {
            path: path.to_path_buf(),
            expected: expected_hex.to_string(),
            actual,
        })
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{:02x}", b);
    }
    s
}

/// A single `hash  filename` line parsed out of a checksum listing
/// (`SHASUMS256.txt`, Maven's `.sha512` sidecar, etc).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumEntry {
    pub hash: String,
    pub filename: String,
}

/// Parse a checksum listing file's contents. Supports two common shapes:
/// `<hash>  <filename>` (GNU coreutils style, used by Node's SHASUMS256.txt)
/// and a bare hash on its own line (Maven's per-artifact `.sha512` files,
/// which carry no filename at all).
pub fn parse_checksum_listing(contents: &str) -> Vec<ChecksumEntry> {
    let mut entries = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.splitn(2, char::is_whitespace);
        let hash = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default().trim();
        // coreutils prefixes the filename with a '*' for binary mode.
        let filename = rest.trim_start_matches('*').to_string();
        if Algorithm::from_hex_len(hash.len()).is_some() {
            entries.push(ChecksumEntry {
                hash: hash.to_string(),
                filename,
            });
        }
    }
    entries
}

/// Find the checksum for `filename` within a parsed listing. Tries, in
/// order: exact filename match, basename match, then substring match
/// (handles listings that qualify names with a path prefix or a
/// version/platform suffix the caller's filename doesn't carry).
pub fn find_checksum<'a>(entries: &'a [ChecksumEntry], filename: &str) -> Option<&'a ChecksumEntry> {
    if let Some(e) = entries.iter().find(|e| e.filename == filename) {
        return Some(e);
    }
    let basename = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    if let Some(e) = entries
        .iter()
        .find(|e| Path::new(&e.filename).file_name().and_then(|n| n.to_str()) == Some(basename))
    {
        return Some(e);
    }
    entries.iter().find(|e| e.filename.contains(basename) || basename.contains(e.filename.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use std::io::Write as _;

    #[test]
    fn digest_matches_known_vector() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        let digest = digest_file(file.path(), Algorithm::Sha256).unwrap();
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn verify_rejects_mismatch() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        let result = verify_file(file.path(), "0".repeat(64).as_str(), Algorithm::Sha256);
        assert!(result.is_err());
    }

    #[test]
    fn parses_coreutils_style_listing() {
        let listing = "deadbeef".repeat(8) + "  node-v20.17.0-linux-x64.tar.gz\n";
        let entries = parse_checksum_listing(&listing);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].filename, "node-v20.17.0-linux-x64.tar.gz");
    }

    #[test]
    fn find_checksum_falls_back_to_basename() {
        let entries = vec![ChecksumEntry {
            hash: "f".repeat(64),
            filename: "dist/node-v20.17.0-linux-x64.tar.gz".to_string(),
        }];
        let found = find_checksum(&entries, "node-v20.17.0-linux-x64.tar.gz").unwrap();
        assert_eq!(found.hash, "f".repeat(64));
    }

    #[test]
    fn algorithm_guessed_from_hex_length() {
        assert_eq!(Algorithm::from_hex_len(64), Some(Algorithm::Sha256));
        assert_eq!(Algorithm::from_hex_len(128), Some(Algorithm::Sha512));
        assert_eq!(Algorithm::from_hex_len(10), None);
    }
}
