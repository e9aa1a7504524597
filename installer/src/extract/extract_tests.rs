//! Unit tests for format-driven archive extraction.

use super::*;
use crate::test_support::{ArchiveEntry, compress, tar_bytes, zip_bytes};
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn sandbox() -> TempDir {
    tempfile::tempdir().expect("temp dir")
}

fn payload() -> Vec<ArchiveEntry> {
    vec![
        ArchiveEntry::dir("tool"),
        ArchiveEntry::executable("tool/bin/tool", b"#!/bin/sh\necho tool\n", 0o755),
        ArchiveEntry::file("tool/README.md", b"# tool\n"),
    ]
}

fn write_archive(sandbox: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = sandbox.path().join(name);
    std::fs::write(&path, bytes).expect("write archive");
    path
}

fn assert_installed(dest: &Path) {
    assert_eq!(
        std::fs::read(dest.join("tool/bin/tool")).expect("read binary"),
        b"#!/bin/sh\necho tool\n"
    );
    assert!(dest.join("tool/README.md").is_file());
}

#[rstest]
#[case::gzip(Compression::Gzip)]
#[case::bzip2(Compression::Bzip2)]
#[case::xz(Compression::Xz)]
#[case::zstd(Compression::Zstd)]
fn compressed_tarballs_are_unwrapped_once(sandbox: TempDir, #[case] compression: Compression) {
    let tarball = compress(compression, &tar_bytes(&payload()).expect("tar")).expect("compress");
    let archive = write_archive(&sandbox, "package.bin", &tarball);
    let dest = sandbox.path().join("install");

    assert_eq!(extract_archive(&archive, &dest).expect("extract"), 3);
    assert_installed(&dest);
    assert_eq!(extract_archive(&archive, &dest).expect("re-extract"), 0);
}

#[rstest]
fn plain_tar_is_extracted(sandbox: TempDir) {
    let archive = write_archive(&sandbox, "package.tar", &tar_bytes(&payload()).expect("tar"));
    let dest = sandbox.path().join("install");

    assert_eq!(extract_archive(&archive, &dest).expect("extract"), 3);
    assert_installed(&dest);
}

#[rstest]
fn zip_is_extracted_directly(sandbox: TempDir) {
    let archive = write_archive(&sandbox, "package.zip", &zip_bytes(&payload()).expect("zip"));
    let dest = sandbox.path().join("install");

    assert_eq!(extract_archive(&archive, &dest).expect("extract"), 3);
    assert_installed(&dest);
}

#[rstest]
fn compressed_zip_is_spooled(sandbox: TempDir) {
    let zipped = zip_bytes(&payload()).expect("zip");
    let archive = write_archive(
        &sandbox,
        "package.zip.gz",
        &compress(Compression::Gzip, &zipped).expect("compress"),
    );
    let dest = sandbox.path().join("install");

    assert_eq!(extract_archive(&archive, &dest).expect("extract"), 3);
    assert_installed(&dest);
}

#[rstest]
fn format_is_identified_by_content_not_name(sandbox: TempDir) {
    let tarball = compress(Compression::Xz, &tar_bytes(&payload()).expect("tar")).expect("xz");
    let archive = write_archive(&sandbox, "misleading.zip", &tarball);
    let dest = sandbox.path().join("install");

    assert_eq!(extract_archive(&archive, &dest).expect("extract"), 3);
}

#[rstest]
fn double_compression_is_unsupported(sandbox: TempDir) {
    let inner = compress(Compression::Gzip, &tar_bytes(&payload()).expect("tar")).expect("gzip");
    let outer = compress(Compression::Zstd, &inner).expect("zstd");
    let archive = write_archive(&sandbox, "package.tar.gz.zst", &outer);

    let err = extract_archive(&archive, &sandbox.path().join("install")).expect_err("rejected");
    assert!(matches!(err, ExtractionError::UnsupportedArchive { .. }), "got {err:?}");
}

#[rstest]
#[case::rar(b"Rar!\x1a\x07\x00rest-of-archive")]
#[case::seven_zip(b"7z\xbc\xaf\x27\x1c\x00\x04rest")]
#[case::text(b"just some text, not an archive")]
#[case::empty(b"")]
fn unextractable_content_is_unsupported(sandbox: TempDir, #[case] bytes: &[u8]) {
    let archive = write_archive(&sandbox, "package.bin", bytes);

    let err = extract_archive(&archive, &sandbox.path().join("install")).expect_err("rejected");
    assert!(matches!(err, ExtractionError::UnsupportedArchive { .. }), "got {err:?}");
}

#[rstest]
fn compressed_rar_is_unsupported(sandbox: TempDir) {
    let wrapped = compress(Compression::Bzip2, b"Rar!\x1a\x07\x00payload").expect("bzip2");
    let archive = write_archive(&sandbox, "package.rar.bz2", &wrapped);

    let err = extract_archive(&archive, &sandbox.path().join("install")).expect_err("rejected");
    assert!(matches!(err, ExtractionError::UnsupportedArchive { .. }), "got {err:?}");
}

#[rstest]
fn missing_archive_is_an_io_error(sandbox: TempDir) {
    let err = extract_archive(&sandbox.path().join("absent.tar"), sandbox.path())
        .expect_err("missing");
    assert!(matches!(err, ExtractionError::Io(_)));
}
