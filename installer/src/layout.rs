//! On-disk layout of the metadata cache, download cache and install tree.
//!
//! Every path is keyed by host, owner, project and version beneath a single
//! base directory:
//!
//! ```text
//! <base>/metadata/<host>/<owner>/<project>/<version>/repositoryRelease.json
//! <base>/downloads/<host>/<owner>/<project>/<version>/<asset name>
//! <base>/installs/<host>/<owner>/<project>/<version>/...
//! ```

use crate::package_spec::PackageSpec;
use camino::{Utf8Path, Utf8PathBuf};

/// Filename of the persisted release listing.
pub const RELEASE_METADATA_FILE: &str = "repositoryRelease.json";

/// Resolves cache and install paths under a base directory.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use ghr_installer::layout::CacheLayout;
/// use ghr_installer::package_spec::PackageSpec;
///
/// let layout = CacheLayout::new(Utf8PathBuf::from("/opt/ghr"), "github.com");
/// let spec = PackageSpec::parse("acme/tool@1.0.0").expect("valid spec");
/// assert_eq!(
///     layout.install_dir(&spec),
///     Utf8PathBuf::from("/opt/ghr/installs/github.com/acme/tool/1.0.0")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    base_directory: Utf8PathBuf,
    host: String,
}

impl CacheLayout {
    /// Create a layout rooted at `base_directory` for releases from `host`.
    #[must_use]
    pub fn new(base_directory: Utf8PathBuf, host: impl Into<String>) -> Self {
        Self {
            base_directory,
            host: host.into(),
        }
    }

    /// Return the base directory.
    #[must_use]
    pub fn base_directory(&self) -> &Utf8Path {
        &self.base_directory
    }

    /// Return the release host segment.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path of the persisted release listing for `spec`.
    #[must_use]
    pub fn metadata_file(&self, spec: &PackageSpec) -> Utf8PathBuf {
        self.keyed("metadata", spec).join(RELEASE_METADATA_FILE)
    }

    /// Directory holding downloaded assets for `spec`.
    #[must_use]
    pub fn download_dir(&self, spec: &PackageSpec) -> Utf8PathBuf {
        self.keyed("downloads", spec)
    }

    /// Directory the package for `spec` is extracted into.
    #[must_use]
    pub fn install_dir(&self, spec: &PackageSpec) -> Utf8PathBuf {
        self.keyed("installs", spec)
    }

    fn keyed(&self, area: &str, spec: &PackageSpec) -> Utf8PathBuf {
        self.base_directory
            .join(area)
            .join(&self.host)
            .join(spec.owner())
            .join(spec.project())
            .join(spec.version().to_string())
    }
}
