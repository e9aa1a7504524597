//! Install orchestration for one release package.
//!
//! The pipeline is:
//!
//! 1. Parse the package specification.
//! 2. Resolve the release listing through the metadata cache.
//! 3. Select the package archive for the host platform.
//! 4. Download the archive and, when published, its checksum manifest.
//! 5. Verify global-scope checksums against the download directory.
//! 6. Extract the archive into the install directory.
//! 7. Verify content-scope checksums against the install directory.
//!
//! Every stage is idempotent, so repeating an install performs no network
//! requests and writes nothing, and an interrupted install can be resumed by
//! running it again. Side effects committed before a failure are kept.

use crate::checksum::ChecksumScope;
use crate::checksum::manifest::ChecksumManifest;
use crate::checksum::verify::verify_directory;
use crate::error::{InstallerError, Result};
use crate::extract::extract_archive;
use crate::layout::CacheLayout;
use crate::matcher::{AssetMatcher, ManifestMatch, MatchRules};
use crate::output::Progress;
use crate::package_spec::PackageSpec;
use crate::platform::HostPlatform;
use crate::release::cache::{Cached, ReleaseCache};
use crate::release::client::ReleaseClient;
use crate::release::model::AssetDescriptor;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use std::io::Write;

/// Collaborators shared by every stage of an install.
#[derive(Clone, Copy)]
pub struct InstallContext<'a> {
    /// Cache and install path scheme.
    pub layout: &'a CacheLayout,
    /// Host platform used to select the package archive.
    pub platform: &'a HostPlatform,
    /// Release service used on cache misses.
    pub client: &'a dyn ReleaseClient,
    /// When true, suppress progress output.
    pub quiet: bool,
}

/// A checksum manifest ready to verify, with where it came from.
struct LoadedManifest {
    manifest: ChecksumManifest,
    scope: ChecksumScope,
    fetched: bool,
}

/// Install the package named by `spec`, e.g. `"owner/project@1.2.3"`.
///
/// Returns `true` if anything was fetched or written, `false` if the
/// package was already fully installed.
///
/// # Errors
///
/// Returns [`InstallerError::Spec`] for a malformed specification,
/// [`InstallerError::NoMatchingAsset`] when no archive fits the host, and
/// the wrapped stage error for any cache, checksum or extraction failure.
pub fn install(spec: &str, ctx: &InstallContext<'_>, out: &mut dyn Write) -> Result<bool> {
    let package = PackageSpec::parse(spec)?;
    install_package(&package, ctx, out)
}

/// Install an already parsed package.
///
/// # Errors
///
/// See [`install`].
pub fn install_package(
    package: &PackageSpec,
    ctx: &InstallContext<'_>,
    out: &mut dyn Write,
) -> Result<bool> {
    let mut progress = Progress::new(out, package, ctx.quiet);
    let cache = ReleaseCache::new(ctx.layout, ctx.client);

    let release = cache.release_metadata(package)?;
    let assets = release.value.assets.as_slice();
    let matcher = AssetMatcher::new(package, ctx.platform, MatchRules::default());
    let selected = matcher
        .select_package(assets)
        .ok_or_else(|| no_matching_asset(package, ctx.platform, assets))?;
    debug!("selected package asset {}", selected.asset.name);

    let archive = fetch_asset(&cache, package, &selected.asset, "package", &mut progress)?;
    let manifest = match matcher.select_manifest(&selected.base_name, assets) {
        Some(found) => Some(load_manifest(&cache, package, &found, &mut progress)?),
        None => {
            info!("{package} publishes no checksum manifest; skipping verification");
            None
        }
    };

    if let Some(loaded) = manifest.as_ref().filter(|m| m.scope == ChecksumScope::Global) {
        verify(&loaded.manifest, &ctx.layout.download_dir(package), &mut progress)?;
    }

    let install_dir = ctx.layout.install_dir(package);
    progress.line("installing");
    let extracted = extract_archive(archive.value.as_std_path(), install_dir.as_std_path())?;

    if let Some(loaded) = manifest.as_ref().filter(|m| m.scope == ChecksumScope::Content) {
        verify(&loaded.manifest, &install_dir, &mut progress)?;
    }

    if extracted > 0 {
        progress.line(format!("installed {extracted} entries"));
    } else {
        progress.line("already installed");
    }

    let manifest_fetched = manifest.as_ref().is_some_and(|m| m.fetched);
    Ok(release.fetched || archive.fetched || manifest_fetched || extracted > 0)
}

fn fetch_asset(
    cache: &ReleaseCache<'_>,
    package: &PackageSpec,
    asset: &AssetDescriptor,
    kind: &str,
    progress: &mut Progress<'_>,
) -> Result<Cached<Utf8PathBuf>> {
    let file = cache.fetch_asset(package, asset, |pending| {
        progress.line(format!("downloading {kind} ({})", pending.download_url));
    })?;
    if !file.fetched {
        progress.line(format!("already downloaded {}", asset.name));
    }
    Ok(file)
}

fn load_manifest(
    cache: &ReleaseCache<'_>,
    package: &PackageSpec,
    found: &ManifestMatch,
    progress: &mut Progress<'_>,
) -> Result<LoadedManifest> {
    let file = fetch_asset(cache, package, &found.asset, "checksums", progress)?;
    let manifest = ChecksumManifest::from_file(file.value.as_std_path(), found.algorithm)?;
    debug!(
        "loaded {} checksum manifest {} with {} entries",
        found.scope,
        found.asset.name,
        manifest.entries().len()
    );
    Ok(LoadedManifest {
        manifest,
        scope: found.scope,
        fetched: file.fetched,
    })
}

fn verify(
    manifest: &ChecksumManifest,
    directory: &Utf8Path,
    progress: &mut Progress<'_>,
) -> Result<()> {
    progress.line("verifying checksums");
    let verified = verify_directory(manifest, directory.as_std_path())?;
    if verified == 0 {
        progress.line("no checksum entries matched; nothing was verified");
    }
    Ok(())
}

fn no_matching_asset(
    package: &PackageSpec,
    platform: &HostPlatform,
    assets: &[AssetDescriptor],
) -> InstallerError {
    InstallerError::NoMatchingAsset {
        spec: package.to_string(),
        platform: platform.to_string(),
        available: assets
            .iter()
            .map(|asset| asset.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
