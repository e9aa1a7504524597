//! Error types for the release installer.
//!
//! Each stage of the pipeline owns a focused error enum; [`InstallerError`]
//! wraps them transparently so callers see the stage's own message, and adds
//! the few failures that only the orchestrator can detect.

use crate::checksum::ChecksumError;
use crate::config::ConfigError;
use crate::extract::ExtractionError;
use crate::package_spec::SpecError;
use crate::release::cache::CacheError;
use crate::release::client::DownloadError;
use thiserror::Error;

/// Errors that can occur during the installation process.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The package specification could not be parsed.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// Installer configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Release metadata or an asset could not be fetched or cached.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A request to the release service failed outside the caches.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// A checksum manifest was invalid or a digest did not match.
    #[error(transparent)]
    Checksum(#[from] ChecksumError),

    /// The package archive could not be extracted.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// No release asset matches the host platform.
    #[error("no asset of {spec} matches {platform}; available assets: {available}")]
    NoMatchingAsset {
        /// The requested package.
        spec: String,
        /// The host platform as `os/arch`.
        platform: String,
        /// Comma-separated asset names from the release listing.
        available: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
