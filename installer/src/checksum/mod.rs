//! Checksum manifest parsing and verification.
//!
//! Releases commonly publish a text manifest of `<hex digest>  <filename>`
//! lines alongside their archives. This module parses that format, resolves
//! the digest algorithm (declared by the manifest name or inferred from the
//! digest length), and verifies listed files found under a directory.
//!
//! # Sub-modules
//!
//! - [`algorithm`] - Supported digest algorithms and file hashing.
//! - [`manifest`] - Manifest text parsing (`ChecksumManifest`).
//! - [`verify`] - Verification of manifest entries against a directory.

pub mod algorithm;
pub mod manifest;
pub mod verify;

use std::fmt;
use thiserror::Error;

/// Which files a checksum manifest describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumScope {
    /// The manifest lists the downloaded release assets themselves.
    Global,
    /// The manifest lists files produced by extracting the package.
    Content,
}

impl fmt::Display for ChecksumScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Content => f.write_str("content"),
        }
    }
}

/// Errors arising from checksum manifest handling.
#[derive(Debug, Error)]
pub enum ChecksumError {
    /// A manifest line is not `<hex digest>  <filename>`.
    #[error("invalid checksum manifest at line {line}: {reason}")]
    InvalidManifest {
        /// One-based line number of the offending line.
        line: usize,
        /// Description of the problem.
        reason: String,
    },

    /// A digest length matches none of the supported algorithms.
    #[error("cannot detect digest algorithm for {filename}: unsupported digest length {length}")]
    UnknownDigestAlgorithm {
        /// The manifest entry filename.
        filename: String,
        /// The raw digest length in bytes.
        length: usize,
    },

    /// A local file does not hash to the digest recorded in the manifest.
    #[error("checksum mismatch for {filename}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// The manifest entry filename.
        filename: String,
        /// Hex digest recorded in the manifest.
        expected: String,
        /// Hex digest computed from the local file.
        actual: String,
    },

    /// Reading the manifest or a listed file failed.
    #[error("checksum I/O error: {0}")]
    Io(#[from] std::io::Error),
}
