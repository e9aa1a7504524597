//! Test doubles and archive builders shared by unit and behaviour tests.
//!
//! Available to this crate's own tests and, through the `test-support`
//! feature, to integration test suites.

use crate::extract::format::Compression;
use crate::release::client::{DownloadError, ReleaseClient};
use crate::release::model::{AssetDescriptor, ReleaseMetadata};
use std::cell::Cell;
use std::collections::HashMap;
use std::io::{self, Cursor, Write};
use std::path::Path;

/// URL prefix used for assets served by [`StubReleaseClient`].
pub const STUB_DOWNLOAD_ROOT: &str = "https://downloads.example.test";

/// An in-memory release service that counts the requests it serves.
///
/// # Examples
///
/// ```
/// use ghr_installer::release::client::ReleaseClient;
/// use ghr_installer::test_support::StubReleaseClient;
///
/// let client = StubReleaseClient::new("v1.0.0").with_asset("tool.zip", b"bytes".to_vec());
/// let release = client.get_release_by_tag("acme", "tool", "v1.0.0").expect("release");
/// assert_eq!(release.assets.len(), 1);
/// assert_eq!(client.metadata_requests(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StubReleaseClient {
    release: ReleaseMetadata,
    bodies: HashMap<String, Vec<u8>>,
    metadata_requests: Cell<usize>,
    download_requests: Cell<usize>,
}

impl StubReleaseClient {
    /// Create a client serving an empty release published as `tag`.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            release: ReleaseMetadata {
                tag_name: tag.to_owned(),
                assets: Vec::new(),
            },
            ..Self::default()
        }
    }

    /// Attach an asset named `name` with the given body.
    #[must_use]
    pub fn with_asset(mut self, name: &str, body: Vec<u8>) -> Self {
        let url = format!("{STUB_DOWNLOAD_ROOT}/{name}");
        self.release.assets.push(AssetDescriptor::new(name, url.clone()));
        self.bodies.insert(url, body);
        self
    }

    /// Replace the body served for an existing asset.
    pub fn set_body(&mut self, name: &str, body: Vec<u8>) {
        self.bodies.insert(format!("{STUB_DOWNLOAD_ROOT}/{name}"), body);
    }

    /// Number of release listing requests served.
    #[must_use]
    pub fn metadata_requests(&self) -> usize {
        self.metadata_requests.get()
    }

    /// Number of asset downloads served.
    #[must_use]
    pub fn download_requests(&self) -> usize {
        self.download_requests.get()
    }
}

impl ReleaseClient for StubReleaseClient {
    fn get_release_by_tag(
        &self,
        owner: &str,
        project: &str,
        tag: &str,
    ) -> Result<ReleaseMetadata, DownloadError> {
        self.metadata_requests.set(self.metadata_requests.get() + 1);
        if tag != self.release.tag_name {
            return Err(DownloadError::NotFound {
                url: format!("stub://{owner}/{project}/releases/tags/{tag}"),
            });
        }
        Ok(self.release.clone())
    }

    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        self.download_requests.set(self.download_requests.get() + 1);
        let body = self.bodies.get(url).ok_or_else(|| DownloadError::NotFound {
            url: url.to_owned(),
        })?;
        std::fs::write(dest, body)?;
        Ok(())
    }
}

/// One entry to place in a generated archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveEntry {
    /// A regular file with permission bits.
    File {
        /// Path inside the archive.
        path: String,
        /// File contents.
        contents: Vec<u8>,
        /// Unix permission bits.
        mode: u32,
    },
    /// A directory.
    Dir {
        /// Path inside the archive.
        path: String,
    },
    /// A symbolic link.
    Symlink {
        /// Path inside the archive.
        path: String,
        /// Link target, stored verbatim.
        target: String,
    },
    /// A tar hard link to an earlier entry.
    HardLink {
        /// Path inside the archive.
        path: String,
        /// Archive path of the linked entry.
        target: String,
    },
}

impl ArchiveEntry {
    /// A regular file with mode `0o644`.
    #[must_use]
    pub fn file(path: &str, contents: &[u8]) -> Self {
        Self::executable(path, contents, 0o644)
    }

    /// A regular file with explicit permission bits.
    #[must_use]
    pub fn executable(path: &str, contents: &[u8], mode: u32) -> Self {
        Self::File {
            path: path.to_owned(),
            contents: contents.to_vec(),
            mode,
        }
    }

    /// A directory entry.
    #[must_use]
    pub fn dir(path: &str) -> Self {
        Self::Dir {
            path: path.to_owned(),
        }
    }

    /// A symbolic link entry.
    #[must_use]
    pub fn symlink(path: &str, target: &str) -> Self {
        Self::Symlink {
            path: path.to_owned(),
            target: target.to_owned(),
        }
    }

    /// A hard link entry.
    #[must_use]
    pub fn hard_link(path: &str, target: &str) -> Self {
        Self::HardLink {
            path: path.to_owned(),
            target: target.to_owned(),
        }
    }
}

/// Build an uncompressed tar archive.
///
/// # Errors
///
/// Returns an error if an entry cannot be encoded.
pub fn tar_bytes(entries: &[ArchiveEntry]) -> io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    for entry in entries {
        let mut header = tar::Header::new_gnu();
        header.set_mtime(0);
        match entry {
            ArchiveEntry::File {
                path,
                contents,
                mode,
            } => {
                header.set_entry_type(tar::EntryType::Regular);
                header.set_mode(*mode);
                header.set_size(contents.len() as u64);
                builder.append_data(&mut header, path, contents.as_slice())?;
            }
            ArchiveEntry::Dir { path } => {
                header.set_entry_type(tar::EntryType::Directory);
                header.set_mode(0o755);
                header.set_size(0);
                builder.append_data(&mut header, path, io::empty())?;
            }
            ArchiveEntry::Symlink { path, target } => {
                header.set_entry_type(tar::EntryType::Symlink);
                header.set_mode(0o777);
                header.set_size(0);
                builder.append_link(&mut header, path, target)?;
            }
            ArchiveEntry::HardLink { path, target } => {
                header.set_entry_type(tar::EntryType::Link);
                header.set_mode(0o644);
                header.set_size(0);
                builder.append_link(&mut header, path, target)?;
            }
        }
    }
    builder.into_inner()
}

/// Build a zip archive. Zip has no hard link entry kind, so hard links are
/// rejected.
///
/// # Errors
///
/// Returns an error if an entry cannot be encoded or a hard link is given.
pub fn zip_bytes(entries: &[ArchiveEntry]) -> io::Result<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for entry in entries {
        match entry {
            ArchiveEntry::File {
                path,
                contents,
                mode,
            } => {
                let options = zip::write::SimpleFileOptions::default().unix_permissions(*mode);
                writer.start_file(path.as_str(), options).map_err(io::Error::other)?;
                writer.write_all(contents)?;
            }
            ArchiveEntry::Dir { path } => {
                let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
                writer.add_directory(path.as_str(), options).map_err(io::Error::other)?;
            }
            ArchiveEntry::Symlink { path, target } => {
                writer
                    .add_symlink(path.as_str(), target.as_str(), zip::write::SimpleFileOptions::default())
                    .map_err(io::Error::other)?;
            }
            ArchiveEntry::HardLink { path, .. } => {
                return Err(io::Error::new(
                    io::ErrorKind::Unsupported,
                    format!("zip archives cannot carry hard link {path}"),
                ));
            }
        }
    }
    Ok(writer.finish().map_err(io::Error::other)?.into_inner())
}

/// Wrap `bytes` in one compression layer.
///
/// # Errors
///
/// Returns an error if the encoder fails.
pub fn compress(compression: Compression, bytes: &[u8]) -> io::Result<Vec<u8>> {
    match compression {
        Compression::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(bytes)?;
            encoder.finish()
        }
        Compression::Bzip2 => {
            let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(bytes)?;
            encoder.finish()
        }
        Compression::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(bytes)?;
            encoder.finish()
        }
        Compression::Zstd => zstd::encode_all(bytes, 0),
    }
}

/// Hex digest of `bytes` with the named algorithm.
#[must_use]
pub fn hex_digest(algorithm: crate::checksum::algorithm::DigestAlgorithm, bytes: &[u8]) -> String {
    let mut reader = bytes;
    algorithm
        .digest_reader(&mut reader)
        .map(hex::encode)
        .unwrap_or_default()
}
