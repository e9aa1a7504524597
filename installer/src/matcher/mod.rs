//! Release asset classification.
//!
//! Release asset names are unstructured, so the installer recognises them
//! with a small grammar evaluated by a non-backtracking [`cursor::Cursor`].
//! [`AssetMatcher`] picks the package archive for the host platform and the
//! checksum manifest that accompanies it.
//!
//! # Sub-modules
//!
//! - [`cursor`] - Immutable prefix cursor.
//! - [`package`] - Package archive grammar.
//! - [`manifest`] - Checksum manifest naming rules.

pub mod cursor;
pub mod manifest;
pub mod package;

use crate::checksum::ChecksumScope;
use crate::checksum::algorithm::{DIGEST_ALGORITHMS, DigestAlgorithm};
use crate::package_spec::PackageSpec;
use crate::platform::HostPlatform;
use crate::release::model::AssetDescriptor;

/// Delimiters accepted between filename components.
pub const DELIMITERS: &[&str] = &[".", "-", "_"];

/// Archive extensions accepted for package assets, in priority order.
pub const ARCHIVE_EXTENSIONS: &[&str] = &[
    ".tar.gz", ".tar.bz2", ".tar.xz", ".tar.zst", ".tgz", ".tar", ".zip", ".rar", ".7z",
];

/// The vocabulary the matching grammar is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    /// Delimiters accepted between filename components.
    pub delimiters: &'static [&'static str],
    /// Archive extensions accepted for package assets.
    pub archive_extensions: &'static [&'static str],
    /// Digest algorithms recognised in manifest names.
    pub digest_algorithms: &'static [DigestAlgorithm],
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            delimiters: DELIMITERS,
            archive_extensions: ARCHIVE_EXTENSIONS,
            digest_algorithms: DIGEST_ALGORITHMS,
        }
    }
}

/// The package archive selected for the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMatch {
    /// The selected asset.
    pub asset: AssetDescriptor,
    /// The asset name without its archive extension.
    pub base_name: String,
}

/// The checksum manifest selected for a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestMatch {
    /// The selected asset.
    pub asset: AssetDescriptor,
    /// The algorithm implied by the manifest name, if any.
    pub algorithm: Option<DigestAlgorithm>,
    /// Whether the manifest covers downloads or extracted content.
    pub scope: ChecksumScope,
}

/// Classifies release assets for one package on one platform.
///
/// # Examples
///
/// ```
/// use ghr_installer::matcher::{AssetMatcher, MatchRules};
/// use ghr_installer::package_spec::PackageSpec;
/// use ghr_installer::platform::HostPlatform;
///
/// let spec = PackageSpec::parse("acme/tool@1.2.3").expect("valid spec");
/// let platform = HostPlatform::new("linux", "amd64");
/// let matcher = AssetMatcher::new(&spec, &platform, MatchRules::default());
/// assert_eq!(
///     matcher.match_package_name("tool_1.2.3_linux_x86_64.tar.gz"),
///     Some("tool_1.2.3_linux_x86_64")
/// );
/// assert_eq!(matcher.match_package_name("tool_1.2.3_darwin_arm64.tar.gz"), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AssetMatcher<'a> {
    spec: &'a PackageSpec,
    platform: &'a HostPlatform,
    rules: MatchRules,
}

impl<'a> AssetMatcher<'a> {
    /// Create a matcher for `spec` on `platform`.
    #[must_use]
    pub const fn new(spec: &'a PackageSpec, platform: &'a HostPlatform, rules: MatchRules) -> Self {
        Self {
            spec,
            platform,
            rules,
        }
    }

    /// Return the base name if `name` is a package archive for this host.
    #[must_use]
    pub fn match_package_name<'n>(&self, name: &'n str) -> Option<&'n str> {
        package::match_package_name(self.spec, self.platform, &self.rules, name)
    }

    /// Select the first asset in listing order that is a package archive
    /// for this host.
    #[must_use]
    pub fn select_package(&self, assets: &[AssetDescriptor]) -> Option<PackageMatch> {
        assets.iter().find_map(|asset| {
            self.match_package_name(&asset.name)
                .map(|base_name| PackageMatch {
                    asset: asset.clone(),
                    base_name: base_name.to_owned(),
                })
        })
    }

    /// Select the first asset in listing order that is a checksum manifest
    /// for the package identified by `base_name`.
    #[must_use]
    pub fn select_manifest(&self, base_name: &str, assets: &[AssetDescriptor]) -> Option<ManifestMatch> {
        assets.iter().find_map(|asset| {
            manifest::classify_manifest_name(self.spec, base_name, &self.rules, &asset.name).map(
                |class| ManifestMatch {
                    asset: asset.clone(),
                    algorithm: class.algorithm,
                    scope: class.scope,
                },
            )
        })
    }
}
