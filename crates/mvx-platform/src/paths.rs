//! Locating binaries inside heterogeneous extracted archive trees.

use std::path::{Path, PathBuf};

/// Recursively walk `root` looking for an entry whose file name equals
/// `binary_name`, and return its parent directory.
///
/// Walk order is deterministic (lexicographic by path) so that, should an
/// archive contain more than one file with the matching name (unusual but
/// not impossible for nested vendor trees), the result is stable across
/// runs. Used to locate `bin/java` under a vendor-named top directory
/// (`jdk-21.0.1+12/bin/java`) or deeper nested layouts
/// (`Contents/Home/bin/java` on macOS).
pub fn find_binary_parent_dir(root: &Path, binary_name: &str) -> Option<PathBuf> {
    let mut entries: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .collect();
    entries.sort();

    entries
        .into_iter()
        .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(binary_name))
        .and_then(|p| p.parent().map(Path::to_path_buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_binary_nested_under_vendor_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let bin_dir = tmp.path().join("jdk-21.0.1+12").join("bin");
        fs::create_dir_all(&bin_dir).unwrap();
        fs::write(bin_dir.join("java"), b"#!/bin/sh").unwrap();

        let found = find_binary_parent_dir(tmp.path(), "java").unwrap();
        assert_eq!(found, bin_dir);
    }

    #[test]
    fn returns_none_when_absent() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(find_binary_parent_dir(tmp.path(), "java").is_none());
    }

    #[test]
    fn finds_macos_nested_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let bin_dir = tmp
            .path()
            .join("jdk-21.0.1+12")
            .join("Contents")
            .join("Home")
            .join("bin");
        fs::create_dir_all(&bin_dir).unwrap();
        fs::write(bin_dir.join("java"), b"#!/bin/sh").unwrap();

        let found = find_binary_parent_dir(tmp.path(), "java").unwrap();
        assert_eq!(found, bin_dir);
    }
}
