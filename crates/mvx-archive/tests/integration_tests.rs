//! Extraction safety tests against archives built in memory (spec.md §4.3).

use mvx_archive::{extract, ArchiveError};
use std::io::Write;
use tempfile::TempDir;

fn write_zip(path: &std::path::Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

fn write_tar_gz(path: &std::path::Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

#[test]
fn zip_strips_shared_top_level_directory() {
    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("jdk.zip");
    write_zip(
        &archive_path,
        &[
            ("jdk-21.0.4/bin/java", b"binary"),
            ("jdk-21.0.4/lib/modules", b"modules"),
        ],
    );

    let dest = dir.path().join("out");
    let extracted = extract(&archive_path, &dest).unwrap();

    assert!(dest.join("bin/java").exists());
    assert!(dest.join("lib/modules").exists());
    assert!(!dest.join("jdk-21.0.4").exists());
    assert_eq!(extracted.len(), 2);
}

#[test]
fn zip_entry_with_traversal_name_is_silently_skipped() {
    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("evil.zip");
    write_zip(
        &archive_path,
        &[
            ("../../etc/passwd", b"nope"),
            ("bin/java", b"binary"),
        ],
    );

    let dest = dir.path().join("out");
    let extracted = extract(&archive_path, &dest).unwrap();

    assert_eq!(extracted, vec![dest.join("bin/java")]);
    assert!(!dir.path().join("etc").exists());
}

#[test]
fn tar_gz_entry_with_traversal_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("evil.tar.gz");
    write_tar_gz(&archive_path, &[("../../evil.txt", b"nope")]);

    let dest = dir.path().join("out");
    let err = extract(&archive_path, &dest).unwrap_err();

    assert!(matches!(err, ArchiveError::UnsafePath { .. }));
    assert!(!dir.path().join("evil.txt").exists());
}

#[test]
fn tar_gz_strips_shared_top_level_and_preserves_mode() {
    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("go.tar.gz");
    write_tar_gz(
        &archive_path,
        &[
            ("go/bin/go", b"binary"),
            ("go/VERSION", b"go1.23.0"),
        ],
    );

    let dest = dir.path().join("out");
    let extracted = extract(&archive_path, &dest).unwrap();

    assert!(dest.join("bin/go").exists());
    assert!(dest.join("VERSION").exists());
    assert_eq!(extracted.len(), 2);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(dest.join("bin/go")).unwrap().permissions().mode();
        assert_eq!(mode & 0o200, 0o200, "extracted files must be owner-writable");
    }
}

#[cfg(unix)]
#[test]
fn tar_gz_symlink_is_recreated_pointing_at_its_recorded_target() {
    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("node.tar.gz");

    let file = std::fs::File::create(&archive_path).unwrap();
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let mut real_header = tar::Header::new_gnu();
    let real_body = b"#!/usr/bin/env node\n";
    real_header.set_size(real_body.len() as u64);
    real_header.set_mode(0o755);
    real_header.set_cksum();
    builder
        .append_data(&mut real_header, "node/lib/node_modules/npm/bin/npm-cli.js", &real_body[..])
        .unwrap();

    let mut link_header = tar::Header::new_gnu();
    link_header.set_entry_type(tar::EntryType::Symlink);
    link_header.set_size(0);
    link_header.set_mode(0o777);
    link_header.set_cksum();
    builder
        .append_link(
            &mut link_header,
            "node/bin/npm",
            "../lib/node_modules/npm/bin/npm-cli.js",
        )
        .unwrap();

    builder.into_inner().unwrap().finish().unwrap();

    let dest = dir.path().join("out");
    extract(&archive_path, &dest).unwrap();

    let link = dest.join("bin/npm");
    let target = std::fs::read_link(&link).unwrap();
    assert_eq!(target, std::path::PathBuf::from("../lib/node_modules/npm/bin/npm-cli.js"));
}

#[test]
fn unsupported_extension_is_rejected_before_touching_disk() {
    let dir = TempDir::new().unwrap();
    let archive_path = dir.path().join("mystery.rar");
    std::fs::write(&archive_path, b"not a real archive").unwrap();

    let dest = dir.path().join("out");
    let err = extract(&archive_path, &dest).unwrap_err();

    assert!(matches!(err, ArchiveError::UnsupportedFormat(_)));
    assert!(!dest.exists());
}
