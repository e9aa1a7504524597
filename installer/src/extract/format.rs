//! Content-based archive format identification.
//!
//! Formats are recognised by magic bytes in the first [`HEADER_LEN`] bytes
//! of a stream, never by filename. A stream is either a compression layer
//! that must be unwrapped before its payload can be identified, or a
//! container whose entries can be extracted directly.

use std::fmt;

/// Number of leading bytes inspected when identifying a stream.
pub const HEADER_LEN: usize = 512;

const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xb5, 0x2f, 0xfd];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const RAR_MAGIC: &[u8] = b"Rar!\x1a\x07";
const SEVEN_ZIP_MAGIC: &[u8] = &[b'7', b'z', 0xbc, 0xaf, 0x27, 0x1c];
const TAR_MAGIC: &[u8] = b"ustar";
const TAR_MAGIC_OFFSET: usize = 257;

/// A single-stream compression layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// gzip (`.gz`, `.tgz`).
    Gzip,
    /// bzip2.
    Bzip2,
    /// xz / LZMA2.
    Xz,
    /// Zstandard.
    Zstd,
}

/// A multi-entry archive container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// POSIX ustar or GNU tar.
    Tar,
    /// PKZIP.
    Zip,
    /// RAR, recognised but not extractable.
    Rar,
    /// 7-Zip, recognised but not extractable.
    SevenZip,
}

impl Container {
    /// Whether entries of this container can be extracted.
    #[must_use]
    pub const fn is_extractable(self) -> bool {
        matches!(self, Self::Tar | Self::Zip)
    }
}

/// The identified format of a byte stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// A compression layer wrapping another stream.
    Compressed(Compression),
    /// An archive container.
    Archive(Container),
}

/// What must happen next to reach archive entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The stream is a container whose entries can be read directly.
    Extractable(Container),
    /// The stream must be decompressed and re-identified first.
    RequiresUnwrap(Compression),
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        })
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tar => "tar",
            Self::Zip => "zip",
            Self::Rar => "rar",
            Self::SevenZip => "7z",
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compressed(compression) => compression.fmt(f),
            Self::Archive(container) => container.fmt(f),
        }
    }
}

/// Identify the format of a stream from its leading bytes.
///
/// # Examples
///
/// ```
/// use ghr_installer::extract::format::{identify, Compression, Format};
///
/// assert_eq!(identify(&[0x1f, 0x8b, 0x08]), Some(Format::Compressed(Compression::Gzip)));
/// assert_eq!(identify(b"plain text"), None);
/// ```
#[must_use]
pub fn identify(header: &[u8]) -> Option<Format> {
    const SIGNATURES: &[(&[u8], Format)] = &[
        (GZIP_MAGIC, Format::Compressed(Compression::Gzip)),
        (BZIP2_MAGIC, Format::Compressed(Compression::Bzip2)),
        (XZ_MAGIC, Format::Compressed(Compression::Xz)),
        (ZSTD_MAGIC, Format::Compressed(Compression::Zstd)),
        (ZIP_MAGIC, Format::Archive(Container::Zip)),
        (ZIP_EMPTY_MAGIC, Format::Archive(Container::Zip)),
        (RAR_MAGIC, Format::Archive(Container::Rar)),
        (SEVEN_ZIP_MAGIC, Format::Archive(Container::SevenZip)),
    ];

    let prefixed = SIGNATURES
        .iter()
        .find(|(magic, _)| header.starts_with(magic))
        .map(|(_, format)| *format);
    prefixed.or_else(|| {
        header
            .get(TAR_MAGIC_OFFSET..)
            .is_some_and(|rest| rest.starts_with(TAR_MAGIC))
            .then_some(Format::Archive(Container::Tar))
    })
}

/// Decide how an identified format is processed.
#[must_use]
pub const fn resolve(format: Format) -> Resolution {
    match format {
        Format::Compressed(compression) => Resolution::RequiresUnwrap(compression),
        Format::Archive(container) => Resolution::Extractable(container),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tar_header() -> Vec<u8> {
        let mut header = vec![0_u8; HEADER_LEN];
        if let Some(magic) = header.get_mut(TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len()) {
            magic.copy_from_slice(TAR_MAGIC);
        }
        header
    }

    #[rstest]
    #[case::gzip(&[0x1f, 0x8b, 0x08, 0x00], Format::Compressed(Compression::Gzip))]
    #[case::bzip2(b"BZh91AY&SY", Format::Compressed(Compression::Bzip2))]
    #[case::xz(&[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00, 0x00], Format::Compressed(Compression::Xz))]
    #[case::zstd(&[0x28, 0xb5, 0x2f, 0xfd, 0x04], Format::Compressed(Compression::Zstd))]
    #[case::zip(b"PK\x03\x04\x14\x00", Format::Archive(Container::Zip))]
    #[case::empty_zip(b"PK\x05\x06\x00\x00", Format::Archive(Container::Zip))]
    #[case::rar(b"Rar!\x1a\x07\x01\x00", Format::Archive(Container::Rar))]
    #[case::seven_zip(&[b'7', b'z', 0xbc, 0xaf, 0x27, 0x1c, 0x00], Format::Archive(Container::SevenZip))]
    fn identifies_prefix_magic(#[case] header: &[u8], #[case] expected: Format) {
        assert_eq!(identify(header), Some(expected));
    }

    #[test]
    fn identifies_ustar_at_offset() {
        assert_eq!(identify(&tar_header()), Some(Format::Archive(Container::Tar)));
    }

    #[rstest]
    #[case::empty(b"")]
    #[case::text(b"#!/bin/sh\necho hi\n")]
    #[case::short_gzip(&[0x1f])]
    #[case::zeroes(&[0_u8; HEADER_LEN])]
    fn unknown_content_is_unidentified(#[case] header: &[u8]) {
        assert_eq!(identify(header), None);
    }

    #[test]
    fn truncated_tar_header_is_unidentified() {
        let header = tar_header();
        let truncated = header.get(..TAR_MAGIC_OFFSET + 2).expect("prefix");
        assert_eq!(identify(truncated), None);
    }

    #[rstest]
    #[case::compressed(
        Format::Compressed(Compression::Xz),
        Resolution::RequiresUnwrap(Compression::Xz)
    )]
    #[case::tar(Format::Archive(Container::Tar), Resolution::Extractable(Container::Tar))]
    #[case::rar(Format::Archive(Container::Rar), Resolution::Extractable(Container::Rar))]
    fn resolve_maps_layers(#[case] format: Format, #[case] expected: Resolution) {
        assert_eq!(resolve(format), expected);
    }

    #[rstest]
    #[case::tar(Container::Tar, true)]
    #[case::zip(Container::Zip, true)]
    #[case::rar(Container::Rar, false)]
    #[case::seven_zip(Container::SevenZip, false)]
    fn only_tar_and_zip_are_extractable(#[case] container: Container, #[case] expected: bool) {
        assert_eq!(container.is_extractable(), expected);
    }
}
