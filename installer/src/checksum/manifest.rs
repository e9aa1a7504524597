//! Checksum manifest text format.
//!
//! One entry per line: a hex digest, exactly two spaces, then the filename.
//! There is no comment syntax; every line must be an entry.

use super::ChecksumError;
use super::algorithm::DigestAlgorithm;
use std::path::Path;

/// Separator between the digest and the filename on each line.
const ENTRY_SEPARATOR: &str = "  ";

/// One `(digest, filename)` line of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumEntry {
    digest: Vec<u8>,
    filename: String,
}

impl ChecksumEntry {
    /// Return the raw digest bytes.
    #[must_use]
    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// Return the filename the digest applies to.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// A parsed checksum manifest.
///
/// # Examples
///
/// ```
/// use ghr_installer::checksum::manifest::ChecksumManifest;
///
/// let text = format!("{}  tool_linux_amd64.tar.gz\n", "ab".repeat(32));
/// let manifest = ChecksumManifest::parse(&text, None).expect("valid manifest");
/// assert_eq!(manifest.entries().len(), 1);
/// assert_eq!(manifest.entries()[0].filename(), "tool_linux_amd64.tar.gz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumManifest {
    algorithm: Option<DigestAlgorithm>,
    entries: Vec<ChecksumEntry>,
}

impl ChecksumManifest {
    /// Parse manifest text.
    ///
    /// `algorithm` is the algorithm implied by the manifest's name, if any;
    /// when absent each entry's algorithm is inferred from its digest length.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError::InvalidManifest`] if any line lacks the
    /// two-space separator or its digest is not valid hex.
    pub fn parse(text: &str, algorithm: Option<DigestAlgorithm>) -> Result<Self, ChecksumError> {
        let entries = text
            .lines()
            .enumerate()
            .map(|(index, line)| parse_line(index + 1, line))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { algorithm, entries })
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError::Io`] if the file cannot be read, or any
    /// error from [`Self::parse`].
    pub fn from_file(path: &Path, algorithm: Option<DigestAlgorithm>) -> Result<Self, ChecksumError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, algorithm)
    }

    /// Return the algorithm declared by the manifest name, if any.
    #[must_use]
    pub const fn algorithm(&self) -> Option<DigestAlgorithm> {
        self.algorithm
    }

    /// Return the entries in manifest order.
    #[must_use]
    pub fn entries(&self) -> &[ChecksumEntry] {
        &self.entries
    }

    /// Resolve the algorithm to use for `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError::UnknownDigestAlgorithm`] when no algorithm
    /// was declared and the digest length is not recognised.
    pub fn algorithm_for(&self, entry: &ChecksumEntry) -> Result<DigestAlgorithm, ChecksumError> {
        if let Some(declared) = self.algorithm {
            return Ok(declared);
        }
        DigestAlgorithm::from_digest_len(entry.digest.len()).ok_or_else(|| {
            ChecksumError::UnknownDigestAlgorithm {
                filename: entry.filename.clone(),
                length: entry.digest.len(),
            }
        })
    }
}

fn parse_line(line: usize, text: &str) -> Result<ChecksumEntry, ChecksumError> {
    let Some((hex_digest, filename)) = text.split_once(ENTRY_SEPARATOR) else {
        return Err(ChecksumError::InvalidManifest {
            line,
            reason: "expected \"<digest>  <filename>\"".to_owned(),
        });
    };
    let digest = hex::decode(hex_digest).map_err(|e| ChecksumError::InvalidManifest {
        line,
        reason: format!("digest is not valid hex: {e}"),
    })?;
    Ok(ChecksumEntry {
        digest,
        filename: filename.to_owned(),
    })
}
