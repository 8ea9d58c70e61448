//! Archive extraction: zip, tar, tar.gz, tar.xz (spec.md §4.3).
//!
//! Every extractor funnels through [`safe_join`] so a malicious entry path
//! (`../../etc/passwd`, an absolute path) can never write outside the
//! destination directory, and through [`strip_top_level`] so a
//! single-top-level-directory archive (the common shape for Java/Node/Go
//! distributions) unpacks flat into the destination instead of one level
//! deeper.

use crate::error::{ArchiveError, Result};
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Zip,
    Tar,
    TarGz,
    TarXz,
}

impl Format {
    /// Infer the archive format from a filename's extension chain.
    pub fn detect(filename: &str) -> Option<Self> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".zip") {
            Some(Format::Zip)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Format::TarGz)
        } else if lower.ends_with(".tar.xz") || lower.ends_with(".txz") {
            Some(Format::TarXz)
        } else if lower.ends_with(".tar") {
            Some(Format::Tar)
        } else {
            None
        }
    }
}

/// Join `entry` onto `destination`, rejecting any entry that would resolve
/// outside of it (`..` components, absolute paths).
fn safe_join(destination: &Path, entry: &Path) -> Result<PathBuf> {
    let mut joined = destination.to_path_buf();
    for component in entry.components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::UnsafePath {
                    entry: entry.to_path_buf(),
                    destination: destination.to_path_buf(),
                });
            }
        }
    }
    if !joined.starts_with(destination) {
        return Err(ArchiveError::UnsafePath {
            entry: entry.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }
    Ok(joined)
}

/// Validate that a tar symlink's recorded target, resolved relative to its
/// own position under `destination`, can never walk outside of it. Rejects
/// absolute targets and any relative target with more `..` segments than it
/// has directories to climb (spec.md §8).
fn validate_symlink_target(destination: &Path, symlink_relative: &Path, link_target: &Path) -> Result<()> {
    let mut stack: Vec<&std::ffi::OsStr> = symlink_relative
        .parent()
        .into_iter()
        .flat_map(|p| p.components())
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    for component in link_target.components() {
        match component {
            Component::Normal(part) => stack.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if stack.pop().is_none() {
                    return Err(ArchiveError::UnsafePath {
                        entry: link_target.to_path_buf(),
                        destination: destination.to_path_buf(),
                    });
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ArchiveError::UnsafePath {
                    entry: link_target.to_path_buf(),
                    destination: destination.to_path_buf(),
                });
            }
        }
    }
    Ok(())
}

/// Create `target` as a symlink to `link_target`. If `target` already
/// exists as a symlink pointing at the same place, no-op; otherwise
/// remove whatever is there first (spec.md §4.3 step 6).
#[cfg(unix)]
fn create_symlink(target: &Path, link_target: &Path) -> Result<()> {
    if let Ok(meta) = fs::symlink_metadata(target) {
        if meta.file_type().is_symlink() && fs::read_link(target).ok().as_deref() == Some(link_target) {
            return Ok(());
        }
        if meta.is_dir() {
            fs::remove_dir_all(target)?;
        } else {
            fs::remove_file(target)?;
        }
    }
    std::os::unix::fs::symlink(link_target, target)?;
    Ok(())
}

/// Extract `archive_path` (format inferred from its filename) into
/// `destination`, stripping a single shared top-level directory if every
/// entry lives under one (spec.md §4.3.5). Returns the list of extracted
/// file paths (directories and symlinks are created but not returned).
pub fn extract(archive_path: &Path, destination: &Path) -> Result<Vec<PathBuf>> {
    let filename = archive_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let format = Format::detect(filename)
        .ok_or_else(|| ArchiveError::UnsupportedFormat(filename.to_string()))?;

    fs::create_dir_all(destination)?;

    match format {
        Format::Zip => extract_zip(archive_path, destination),
        Format::Tar => {
            let file = fs::File::open(archive_path)?;
            extract_tar_entries(file, destination)
        }
        Format::TarGz => {
            let file = fs::File::open(archive_path)?;
            let decoder = flate2::read::GzDecoder::new(file);
            extract_tar_entries(decoder, destination)
        }
        Format::TarXz => {
            let file = fs::File::open(archive_path)?;
            let decoder = xz2::read::XzDecoder::new(file);
            extract_tar_entries(decoder, destination)
        }
    }
}

fn extract_zip(archive_path: &Path, destination: &Path) -> Result<Vec<PathBuf>> {
    let file = fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ArchiveError::Open {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let top_level = common_top_level(
        (0..archive.len())
            .filter_map(|i| archive.by_index(i).ok().and_then(|f| f.enclosed_name())),
    );

    let mut extracted = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| ArchiveError::Extraction {
            path: archive_path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let raw_name = match entry.enclosed_name() {
            Some(name) => name,
            None => continue,
        };
        let relative = strip_prefix_if(&raw_name, top_level.as_deref());
        let target = safe_join(destination, &relative)?;

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&target)?;
        std::io::copy(&mut entry, &mut out)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                let mode = mode | 0o200;
                let _ = fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o777));
            }
        }
        extracted.push(target);
    }
    Ok(extracted)
}

fn extract_tar_entries<R: Read>(reader: R, destination: &Path) -> Result<Vec<PathBuf>> {
    // tar::Archive only allows a single pass over entries, so compute the
    // shared top-level directory by buffering entry paths first.
    let mut archive = tar::Archive::new(reader);
    let entries = archive.entries()?;

    let mut extracted = Vec::new();
    let mut paths = Vec::new();
    let mut bodies: Vec<(PathBuf, bool, Option<u32>, Option<PathBuf>, Vec<u8>)> = Vec::new();

    for entry in entries {
        let mut entry = entry?;
        let path = entry.path()?.to_path_buf();
        let is_dir = entry.header().entry_type().is_dir();
        let is_symlink = entry.header().entry_type().is_symlink();
        let mode = entry.header().mode().ok();
        let link_target = if is_symlink {
            entry.link_name()?.map(|p| p.into_owned())
        } else {
            None
        };
        paths.push(path.clone());

        let mut buf = Vec::new();
        if !is_dir && !is_symlink {
            entry.read_to_end(&mut buf)?;
        }
        bodies.push((path, is_dir, mode, link_target, buf));
    }

    let top_level = common_top_level(paths.into_iter());

    for (path, is_dir, mode, link_target, buf) in bodies {
        let relative = strip_prefix_if(&path, top_level.as_deref());
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = safe_join(destination, &relative)?;

        if is_dir {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        if let Some(link_target) = link_target {
            validate_symlink_target(destination, &relative, &link_target)?;

            #[cfg(unix)]
            {
                create_symlink(&target, &link_target)?;
            }
            continue;
        }

        fs::write(&target, &buf)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = mode.unwrap_or(0o644) | 0o200;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o777))?;
        }
        extracted.push(target);
    }

    Ok(extracted)
}

/// If every path shares the same first component, return it.
fn common_top_level<I: Iterator<Item = PathBuf>>(paths: I) -> Option<PathBuf> {
    let mut top: Option<PathBuf> = None;
    for path in paths {
        let first = match path.components().next() {
            Some(Component::Normal(part)) => PathBuf::from(part),
            _ => return None,
        };
        match &top {
            None => top = Some(first),
            Some(existing) if existing != &first => return None,
            Some(_) => {}
        }
    }
    top
}

fn strip_prefix_if(path: &Path, prefix: Option<&Path>) -> PathBuf {
    match prefix {
        Some(prefix) => path.strip_prefix(prefix).unwrap_or(path).to_path_buf(),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_formats_from_filename() {
        assert_eq!(Format::detect("jdk.zip"), Some(Format::Zip));
        assert_eq!(Format::detect("node.tar.gz"), Some(Format::TarGz));
        assert_eq!(Format::detect("node.tgz"), Some(Format::TarGz));
        assert_eq!(Format::detect("go.tar.xz"), Some(Format::TarXz));
        assert_eq!(Format::detect("plain.tar"), Some(Format::Tar));
        assert_eq!(Format::detect("weird.rar"), None);
    }

    #[test]
    fn safe_join_rejects_traversal() {
        let dest = Path::new("/tmp/mvx-dest");
        let result = safe_join(dest, Path::new("../../etc/passwd"));
        assert!(result.is_err());
    }

    #[test]
    fn safe_join_rejects_absolute() {
        let dest = Path::new("/tmp/mvx-dest");
        let result = safe_join(dest, Path::new("/etc/passwd"));
        assert!(result.is_err());
    }

    #[test]
    fn safe_join_accepts_nested_relative() {
        let dest = Path::new("/tmp/mvx-dest");
        let result = safe_join(dest, Path::new("bin/java")).unwrap();
        assert_eq!(result, Path::new("/tmp/mvx-dest/bin/java"));
    }

    #[test]
    fn common_top_level_detects_shared_prefix() {
        let paths = vec![
            PathBuf::from("jdk-21.0.4/bin/java"),
            PathBuf::from("jdk-21.0.4/lib/foo.jar"),
        ];
        assert_eq!(
            common_top_level(paths.into_iter()),
            Some(PathBuf::from("jdk-21.0.4"))
        );
    }

    #[test]
    fn common_top_level_none_when_mixed() {
        let paths = vec![PathBuf::from("a/b"), PathBuf::from("c/d")];
        assert_eq!(common_top_level(paths.into_iter()), None);
    }

    #[test]
    fn validate_symlink_target_accepts_escape_that_stays_inside() {
        let dest = Path::new("/tmp/mvx-dest");
        let result = validate_symlink_target(
            dest,
            Path::new("bin/npm"),
            Path::new("../lib/node_modules/npm/bin/npm-cli.js"),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn validate_symlink_target_rejects_escape_past_destination() {
        let dest = Path::new("/tmp/mvx-dest");
        let result = validate_symlink_target(dest, Path::new("bin/npm"), Path::new("../../../etc/passwd"));
        assert!(result.is_err());
    }

    #[test]
    fn validate_symlink_target_rejects_absolute_target() {
        let dest = Path::new("/tmp/mvx-dest");
        let result = validate_symlink_target(dest, Path::new("bin/npm"), Path::new("/etc/passwd"));
        assert!(result.is_err());
    }
}
