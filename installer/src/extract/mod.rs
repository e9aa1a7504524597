//! Archive extraction into an install directory.
//!
//! The archive format is identified from content. A single compression
//! layer (gzip, bzip2, xz or zstd) is unwrapped and the decompressed stream
//! re-identified; tar and zip containers are then unpacked entry by entry
//! with path traversal protection. Re-running an extraction only writes
//! entries whose output paths are missing.
//!
//! # Sub-modules
//!
//! - [`format`] - Magic-byte identification and layer resolution.

mod entries;
pub mod format;

use format::{Compression, Container, HEADER_LEN, Resolution, identify, resolve};
use log::debug;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::Path;

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The archive format is unknown or has no extraction support.
    #[error("unsupported archive {archive}: {reason}")]
    UnsupportedArchive {
        /// The archive being extracted.
        archive: String,
        /// Why the content cannot be extracted.
        reason: String,
    },

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// I/O error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Extract `archive_path` into `dest_dir`, skipping entries already present.
///
/// Returns the number of entries materialised; zero means the install
/// directory already held every entry.
///
/// # Errors
///
/// Returns [`ExtractionError::UnsupportedArchive`] for unknown content,
/// RAR or 7z containers, and doubly compressed streams;
/// [`ExtractionError::PathTraversal`] if an entry escapes `dest_dir`; and
/// [`ExtractionError::Io`] on read or write failures. Entries written before
/// a failure are left in place.
///
/// # Examples
///
/// ```
/// use ghr_installer::extract::extract_archive;
///
/// let temp = tempfile::tempdir().expect("temp dir");
/// let archive = temp.path().join("bundle.tar");
/// let mut builder = tar::Builder::new(std::fs::File::create(&archive).expect("create"));
/// let mut header = tar::Header::new_gnu();
/// header.set_size(5);
/// header.set_mode(0o644);
/// builder
///     .append_data(&mut header, "hello.txt", &b"hello"[..])
///     .expect("append");
/// builder.finish().expect("finish");
///
/// let dest = temp.path().join("out");
/// assert_eq!(extract_archive(&archive, &dest).expect("extract"), 1);
/// assert_eq!(extract_archive(&archive, &dest).expect("re-extract"), 0);
/// ```
pub fn extract_archive(archive_path: &Path, dest_dir: &Path) -> Result<usize, ExtractionError> {
    let archive = archive_path.display().to_string();
    let mut file = File::open(archive_path)?;
    let header = read_header(&mut file)?;
    file.rewind()?;

    std::fs::create_dir_all(dest_dir)?;
    match resolve_header(&archive, &header)? {
        Resolution::Extractable(Container::Zip) => {
            debug!("extracting zip archive {archive}");
            entries::unpack_zip(BufReader::new(file), dest_dir)
        }
        Resolution::Extractable(container) => {
            debug!("extracting {container} archive {archive}");
            extract_stream(container, &archive, BufReader::new(file), dest_dir)
        }
        Resolution::RequiresUnwrap(compression) => {
            debug!("unwrapping {compression} layer of {archive}");
            let mut decoder = decompress(compression, BufReader::new(file))?;
            let inner_header = read_header(&mut decoder)?;
            match resolve_header(&archive, &inner_header)? {
                Resolution::RequiresUnwrap(inner) => Err(ExtractionError::UnsupportedArchive {
                    archive,
                    reason: format!("{compression} stream wraps a further {inner} layer"),
                }),
                Resolution::Extractable(container) => {
                    debug!("extracting {container} archive inside {compression} stream");
                    let payload = io::Cursor::new(inner_header).chain(decoder);
                    extract_stream(container, &archive, payload, dest_dir)
                }
            }
        }
    }
}

fn resolve_header(archive: &str, header: &[u8]) -> Result<Resolution, ExtractionError> {
    identify(header)
        .map(resolve)
        .ok_or_else(|| ExtractionError::UnsupportedArchive {
            archive: archive.to_owned(),
            reason: "unrecognised content".to_owned(),
        })
}

/// Unpack a container from a sequential stream.
///
/// Zip needs random access, so a zip carried inside a compression layer is
/// spooled to an anonymous temporary file first.
fn extract_stream<R: Read>(
    container: Container,
    archive: &str,
    mut reader: R,
    dest_dir: &Path,
) -> Result<usize, ExtractionError> {
    match container {
        Container::Tar => entries::unpack_tar(reader, dest_dir),
        Container::Zip => {
            let mut spool = tempfile::tempfile()?;
            io::copy(&mut reader, &mut spool)?;
            spool.rewind()?;
            entries::unpack_zip(BufReader::new(spool), dest_dir)
        }
        Container::Rar | Container::SevenZip => Err(ExtractionError::UnsupportedArchive {
            archive: archive.to_owned(),
            reason: format!("{container} archives cannot be extracted"),
        }),
    }
}

fn decompress<R: io::BufRead + 'static>(
    compression: Compression,
    reader: R,
) -> io::Result<Box<dyn Read>> {
    Ok(match compression {
        Compression::Gzip => Box::new(flate2::bufread::MultiGzDecoder::new(reader)),
        Compression::Bzip2 => Box::new(bzip2::bufread::MultiBzDecoder::new(reader)),
        Compression::Xz => Box::new(xz2::bufread::XzDecoder::new_multi_decoder(reader)),
        Compression::Zstd => Box::new(zstd::stream::read::Decoder::with_buffer(reader)?),
    })
}

/// Read up to [`HEADER_LEN`] leading bytes for identification.
fn read_header(reader: &mut dyn Read) -> io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    reader.take(HEADER_LEN as u64).read_to_end(&mut header)?;
    Ok(header)
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
