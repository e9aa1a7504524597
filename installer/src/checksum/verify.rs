//! Verification of manifest entries against files in a directory.

use super::ChecksumError;
use super::manifest::ChecksumManifest;
use log::{debug, warn};
use std::path::{Component, Path};

/// Verify every manifest entry whose file exists under `directory`.
///
/// Entries naming files that are not present are skipped, since manifests
/// routinely list the artefacts of every platform. Absolute names and names
/// with `..` components are treated as not present. Returns the number of
/// entries that were hashed and matched. A count of zero is logged as a
/// warning but is not an error.
///
/// # Errors
///
/// Returns [`ChecksumError::ChecksumMismatch`] on the first digest that does
/// not match, [`ChecksumError::UnknownDigestAlgorithm`] for an entry whose
/// algorithm cannot be resolved, and [`ChecksumError::Io`] if a present file
/// cannot be read.
///
/// # Examples
///
/// ```
/// use ghr_installer::checksum::algorithm::DigestAlgorithm;
/// use ghr_installer::checksum::manifest::ChecksumManifest;
/// use ghr_installer::checksum::verify::verify_directory;
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// std::fs::write(dir.path().join("tool.zip"), b"payload").expect("write");
/// let digest = DigestAlgorithm::Sha256
///     .digest_file(&dir.path().join("tool.zip"))
///     .expect("digest");
/// let text = format!("{}  tool.zip\n{}  other.zip\n", hex::encode(&digest), hex::encode(&digest));
/// let manifest = ChecksumManifest::parse(&text, None).expect("manifest");
/// assert_eq!(verify_directory(&manifest, dir.path()).expect("verified"), 1);
/// ```
pub fn verify_directory(manifest: &ChecksumManifest, directory: &Path) -> Result<usize, ChecksumError> {
    let mut verified = 0;
    for entry in manifest.entries() {
        if !stays_within(Path::new(entry.filename())) {
            debug!(
                "checksum entry {} points outside {}; skipping",
                entry.filename(),
                directory.display()
            );
            continue;
        }
        let path = directory.join(entry.filename());
        if !path.try_exists()? {
            debug!("checksum entry {} not present locally; skipping", entry.filename());
            continue;
        }

        let algorithm = manifest.algorithm_for(entry)?;
        let actual = algorithm.digest_file(&path)?;
        if actual != entry.digest() {
            return Err(ChecksumError::ChecksumMismatch {
                filename: entry.filename().to_owned(),
                expected: hex::encode(entry.digest()),
                actual: hex::encode(actual),
            });
        }
        debug!("{algorithm} checksum verified for {}", entry.filename());
        verified += 1;
    }

    if verified == 0 {
        warn!(
            "no checksum manifest entries matched files in {}",
            directory.display()
        );
    }
    Ok(verified)
}

/// Whether `filename` names a path beneath the directory it is joined to.
fn stays_within(filename: &Path) -> bool {
    filename
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::algorithm::DigestAlgorithm;

    const ARCHIVE_NAME: &str = "myproj_linux_amd64.tar.gz";

    fn write_file(dir: &Path, name: &str, contents: &[u8]) {
        std::fs::write(dir.join(name), contents).expect("write file");
    }

    fn manifest_for(dir: &Path, name: &str, algorithm: DigestAlgorithm) -> ChecksumManifest {
        let digest = algorithm.digest_file(&dir.join(name)).expect("digest");
        let text = format!("{}  {name}\n", hex::encode(digest));
        ChecksumManifest::parse(&text, None).expect("manifest")
    }

    #[test]
    fn sha512_entry_verifies_then_detects_flipped_byte() {
        let temp = tempfile::tempdir().expect("temp dir");
        let mut contents = b"release archive bytes".to_vec();
        write_file(temp.path(), ARCHIVE_NAME, &contents);
        let manifest = manifest_for(temp.path(), ARCHIVE_NAME, DigestAlgorithm::Sha512);

        assert_eq!(verify_directory(&manifest, temp.path()).expect("verified"), 1);

        if let Some(first) = contents.first_mut() {
            *first ^= 0x01;
        }
        write_file(temp.path(), ARCHIVE_NAME, &contents);
        let err = verify_directory(&manifest, temp.path()).expect_err("expected mismatch");
        assert!(
            matches!(&err, ChecksumError::ChecksumMismatch { filename, .. } if filename == ARCHIVE_NAME),
            "got {err:?}"
        );
    }

    #[test]
    fn missing_files_are_skipped() {
        let temp = tempfile::tempdir().expect("temp dir");
        let text = format!("{}  absent.zip\n", "ab".repeat(32));
        let manifest = ChecksumManifest::parse(&text, None).expect("manifest");
        assert_eq!(verify_directory(&manifest, temp.path()).expect("no error"), 0);
    }

    #[test]
    fn unknown_length_fails_only_for_present_files() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_file(temp.path(), "present.bin", b"data");
        let absent_text = format!("{}  absent.bin\n", "ab".repeat(17));
        let absent = ChecksumManifest::parse(&absent_text, None).expect("manifest");
        assert_eq!(verify_directory(&absent, temp.path()).expect("skipped"), 0);

        let present_text = format!("{}  present.bin\n", "ab".repeat(17));
        let present = ChecksumManifest::parse(&present_text, None).expect("manifest");
        let err = verify_directory(&present, temp.path()).expect_err("expected rejection");
        assert!(matches!(err, ChecksumError::UnknownDigestAlgorithm { .. }));
    }

    #[test]
    fn declared_algorithm_is_used_for_every_entry() {
        let temp = tempfile::tempdir().expect("temp dir");
        write_file(temp.path(), "a.bin", b"alpha");
        let digest = DigestAlgorithm::Sha256
            .digest_file(&temp.path().join("a.bin"))
            .expect("digest");
        let text = format!("{}  a.bin\n", hex::encode(digest));
        let manifest =
            ChecksumManifest::parse(&text, Some(DigestAlgorithm::Sha256)).expect("manifest");
        assert_eq!(verify_directory(&manifest, temp.path()).expect("verified"), 1);
    }

    #[test]
    fn entries_outside_directory_are_not_consulted() {
        let temp = tempfile::tempdir().expect("temp dir");
        let target = temp.path().join("target");
        std::fs::create_dir_all(&target).expect("create dir");
        write_file(temp.path(), "unrelated.bin", b"outside the target");
        let absolute = temp.path().join("unrelated.bin");
        let text = format!(
            "{digest}  {}\n{digest}  ../unrelated.bin\n",
            absolute.display(),
            digest = "ab".repeat(32)
        );
        let manifest = ChecksumManifest::parse(&text, None).expect("manifest");

        assert_eq!(verify_directory(&manifest, &target).expect("skipped"), 0);
    }

    #[test]
    fn nested_filenames_resolve_under_directory() {
        let temp = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(temp.path().join("bin")).expect("create dir");
        write_file(temp.path(), "bin/tool", b"binary");
        let manifest = manifest_for(temp.path(), "bin/tool", DigestAlgorithm::Sha1);
        assert_eq!(verify_directory(&manifest, temp.path()).expect("verified"), 1);
    }
}
