//! Release metadata and asset caches.
//!
//! Both caches treat the presence of a file at its keyed path as proof that
//! the fetch already happened, so each identity touches the network at most
//! once. Writes go to a temporary file in the destination directory and are
//! renamed into place, so an interrupted fetch never leaves a partial file
//! at the final path.

use super::client::{DownloadError, ReleaseClient};
use super::model::{AssetDescriptor, ReleaseMetadata};
use crate::layout::CacheLayout;
use crate::package_spec::PackageSpec;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::io::{self, Write};
use thiserror::Error;

/// Errors arising from the metadata and download caches.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The asset name cannot be used as a single path component.
    #[error("refusing to cache asset with unsafe name {name:?}")]
    InvalidAssetName {
        /// The offending asset name.
        name: String,
    },

    /// The persisted release listing could not be decoded.
    #[error("cached release metadata at {path} is corrupt: {source}")]
    CorruptMetadata {
        /// Path of the cached listing.
        path: Utf8PathBuf,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// Fetching from the release service failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// A cache file could not be read or written.
    #[error("cache I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A cached value together with whether obtaining it touched the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cached<T> {
    /// The cached value.
    pub value: T,
    /// `true` when the value was fetched during this call.
    pub fetched: bool,
}

impl<T> Cached<T> {
    const fn hit(value: T) -> Self {
        Self {
            value,
            fetched: false,
        }
    }

    const fn miss(value: T) -> Self {
        Self {
            value,
            fetched: true,
        }
    }
}

/// Release metadata and asset cache over one [`CacheLayout`].
#[derive(Clone, Copy)]
pub struct ReleaseCache<'a> {
    layout: &'a CacheLayout,
    client: &'a dyn ReleaseClient,
}

impl<'a> ReleaseCache<'a> {
    /// Create a cache that fetches misses through `client`.
    #[must_use]
    pub const fn new(layout: &'a CacheLayout, client: &'a dyn ReleaseClient) -> Self {
        Self { layout, client }
    }

    /// Return the release listing for `spec`, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::CorruptMetadata`] if a persisted listing cannot
    /// be decoded, [`CacheError::Download`] if fetching fails, and
    /// [`CacheError::Io`] if the listing cannot be read or persisted.
    pub fn release_metadata(&self, spec: &PackageSpec) -> Result<Cached<ReleaseMetadata>, CacheError> {
        let path = self.layout.metadata_file(spec);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                debug!("release metadata cache hit at {path}");
                let metadata = serde_json::from_str(&text)
                    .map_err(|source| CacheError::CorruptMetadata { path, source })?;
                return Ok(Cached::hit(metadata));
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        info!("fetching release {} for {spec}", spec.tag());
        let metadata = self
            .client
            .get_release_by_tag(spec.owner(), spec.project(), &spec.tag())?;
        let json = serde_json::to_vec_pretty(&metadata).map_err(io::Error::other)?;
        persist_atomically(&path, |file| file.write_all(&json))?;
        Ok(Cached::miss(metadata))
    }

    /// Return the local path of `asset`, downloading it on first use.
    ///
    /// Bytes already present at the destination are trusted as-is.
    /// `before_download` runs only when the asset is about to be fetched.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidAssetName`] for unsafe asset names,
    /// [`CacheError::Download`] if the download fails, and
    /// [`CacheError::Io`] if the file cannot be written.
    pub fn fetch_asset(
        &self,
        spec: &PackageSpec,
        asset: &AssetDescriptor,
        before_download: impl FnOnce(&AssetDescriptor),
    ) -> Result<Cached<Utf8PathBuf>, CacheError> {
        let path = self.asset_path(spec, asset)?;
        if path.as_std_path().try_exists()? {
            debug!("asset {} already downloaded at {path}", asset.name);
            return Ok(Cached::hit(path));
        }

        before_download(asset);
        info!("downloading {} from {}", asset.name, asset.download_url);
        let dir = parent_dir(&path)?;
        std::fs::create_dir_all(dir)?;
        let temp = tempfile::NamedTempFile::new_in(dir)?;
        self.client.download(&asset.download_url, temp.path())?;
        temp.persist(&path).map_err(|err| err.error)?;
        Ok(Cached::miss(path))
    }

    fn asset_path(&self, spec: &PackageSpec, asset: &AssetDescriptor) -> Result<Utf8PathBuf, CacheError> {
        validate_asset_name(&asset.name)?;
        Ok(self.layout.download_dir(spec).join(&asset.name))
    }
}

/// Reject asset names that are not a single, normal path component.
fn validate_asset_name(name: &str) -> Result<(), CacheError> {
    let unsafe_name = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if unsafe_name {
        return Err(CacheError::InvalidAssetName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

fn parent_dir(path: &Utf8Path) -> io::Result<&Utf8Path> {
    path.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path} has no parent directory"),
        )
    })
}

/// Write a file through a temporary sibling and rename it into place.
fn persist_atomically(
    path: &Utf8Path,
    write: impl FnOnce(&mut std::fs::File) -> io::Result<()>,
) -> io::Result<()> {
    let dir = parent_dir(path)?;
    std::fs::create_dir_all(dir)?;
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    write(temp.as_file_mut())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
