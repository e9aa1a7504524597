//! Digest algorithms supported by checksum manifests.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// A digest algorithm that may appear in a release checksum manifest.
///
/// Each algorithm produces a distinct digest length, so a raw digest
/// identifies its algorithm unambiguously.
///
/// # Examples
///
/// ```
/// use ghr_installer::checksum::algorithm::DigestAlgorithm;
///
/// assert_eq!(DigestAlgorithm::from_digest_len(32), Some(DigestAlgorithm::Sha256));
/// assert_eq!(DigestAlgorithm::from_digest_len(17), None);
/// assert_eq!(DigestAlgorithm::Sha512.name(), "sha512");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// MD5, 16-byte digest.
    Md5,
    /// SHA-1, 20-byte digest.
    Sha1,
    /// SHA-224, 28-byte digest.
    Sha224,
    /// SHA-256, 32-byte digest.
    Sha256,
    /// SHA-384, 48-byte digest.
    Sha384,
    /// SHA-512, 64-byte digest.
    Sha512,
}

/// Every supported algorithm, in the order manifest names are probed.
pub const DIGEST_ALGORITHMS: &[DigestAlgorithm] = &[
    DigestAlgorithm::Md5,
    DigestAlgorithm::Sha1,
    DigestAlgorithm::Sha224,
    DigestAlgorithm::Sha256,
    DigestAlgorithm::Sha384,
    DigestAlgorithm::Sha512,
];

impl DigestAlgorithm {
    /// Return the lowercase algorithm token used in manifest filenames.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Return the raw digest length in bytes.
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// Infer the algorithm from a raw digest length.
    #[must_use]
    pub fn from_digest_len(len: usize) -> Option<Self> {
        DIGEST_ALGORITHMS
            .iter()
            .copied()
            .find(|algorithm| algorithm.digest_len() == len)
    }

    /// Look up an algorithm by its token, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        DIGEST_ALGORITHMS
            .iter()
            .copied()
            .find(|algorithm| algorithm.name().eq_ignore_ascii_case(name))
    }

    /// Compute the digest of everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while reading.
    pub fn digest_reader(self, reader: &mut dyn Read) -> io::Result<Vec<u8>> {
        match self {
            Self::Md5 => digest_with::<Md5>(reader),
            Self::Sha1 => digest_with::<Sha1>(reader),
            Self::Sha224 => digest_with::<Sha224>(reader),
            Self::Sha256 => digest_with::<Sha256>(reader),
            Self::Sha384 => digest_with::<Sha384>(reader),
            Self::Sha512 => digest_with::<Sha512>(reader),
        }
    }

    /// Compute the digest of the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    pub fn digest_file(self, path: &Path) -> io::Result<Vec<u8>> {
        let mut file = fs::File::open(path)?;
        self.digest_reader(&mut file)
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn digest_with<D: Digest>(reader: &mut dyn Read) -> io::Result<Vec<u8>> {
    let mut hasher = D::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(hasher.finalize().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::md5(16, DigestAlgorithm::Md5)]
    #[case::sha1(20, DigestAlgorithm::Sha1)]
    #[case::sha224(28, DigestAlgorithm::Sha224)]
    #[case::sha256(32, DigestAlgorithm::Sha256)]
    #[case::sha384(48, DigestAlgorithm::Sha384)]
    #[case::sha512(64, DigestAlgorithm::Sha512)]
    fn digest_length_selects_algorithm(#[case] len: usize, #[case] expected: DigestAlgorithm) {
        assert_eq!(DigestAlgorithm::from_digest_len(len), Some(expected));
    }

    #[rstest]
    #[case(0)]
    #[case(17)]
    #[case(33)]
    #[case(128)]
    fn unknown_lengths_are_rejected(#[case] len: usize) {
        assert_eq!(DigestAlgorithm::from_digest_len(len), None);
    }

    #[test]
    fn names_round_trip_case_insensitively() {
        for algorithm in DIGEST_ALGORITHMS {
            assert_eq!(DigestAlgorithm::from_name(algorithm.name()), Some(*algorithm));
            let upper = algorithm.name().to_ascii_uppercase();
            assert_eq!(DigestAlgorithm::from_name(&upper), Some(*algorithm));
        }
        assert_eq!(DigestAlgorithm::from_name("crc32"), None);
    }

    #[test]
    fn computed_digests_have_declared_length() {
        for algorithm in DIGEST_ALGORITHMS {
            let digest = algorithm
                .digest_reader(&mut &b"hello"[..])
                .expect("in-memory read");
            assert_eq!(digest.len(), algorithm.digest_len(), "{algorithm}");
        }
    }

    #[test]
    fn sha256_matches_known_vector() {
        let digest = DigestAlgorithm::Sha256
            .digest_reader(&mut &b"abc"[..])
            .expect("in-memory read");
        assert_eq!(
            hex::encode(digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn md5_matches_known_vector() {
        let digest = DigestAlgorithm::Md5
            .digest_reader(&mut &b""[..])
            .expect("in-memory read");
        assert_eq!(hex::encode(digest), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn digest_file_reads_from_disk() {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = temp.path().join("payload.bin");
        std::fs::write(&path, b"abc").expect("write payload");
        let from_file = DigestAlgorithm::Sha1.digest_file(&path).expect("digest file");
        let in_memory = DigestAlgorithm::Sha1
            .digest_reader(&mut &b"abc"[..])
            .expect("in-memory read");
        assert_eq!(from_file, in_memory);
    }
}
