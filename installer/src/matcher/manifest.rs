//! Checksum manifest naming rules.
//!
//! Rules are evaluated in order and the first one that matches decides both
//! the optional algorithm hint and the manifest scope:
//!
//! 1. Well-known names such as `checksums.txt`, `SHASUMS256.txt` or
//!    `sha512sums.txt` (global scope).
//! 2. `<project><delim><version><delim>checksums.txt` (global scope).
//! 3. `<base name><delim><algorithm>sum.txt` (content scope).

use super::MatchRules;
use super::cursor::Cursor;
use crate::checksum::ChecksumScope;
use crate::checksum::algorithm::DigestAlgorithm;
use crate::package_spec::PackageSpec;

/// The generic manifest name that leaves algorithm detection per entry.
const GENERIC_MANIFEST: &str = "checksums.txt";

/// The outcome of classifying one asset name as a checksum manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestClass {
    /// The algorithm implied by the name, if any.
    pub algorithm: Option<DigestAlgorithm>,
    /// Which files the manifest describes.
    pub scope: ChecksumScope,
}

/// Classify `name` as a checksum manifest for the package whose archive
/// base name is `base_name`.
#[must_use]
pub fn classify_manifest_name(
    spec: &PackageSpec,
    base_name: &str,
    rules: &MatchRules,
    name: &str,
) -> Option<ManifestClass> {
    well_known_manifest(rules, name)
        .or_else(|| release_manifest(spec, rules, name))
        .or_else(|| content_manifest(base_name, rules, name))
}

fn well_known_manifest(rules: &MatchRules, name: &str) -> Option<ManifestClass> {
    let global = |algorithm| {
        Some(ManifestClass {
            algorithm,
            scope: ChecksumScope::Global,
        })
    };

    if name == GENERIC_MANIFEST {
        return global(None);
    }
    if name.eq_ignore_ascii_case("SHASUMS256.txt") {
        return global(Some(DigestAlgorithm::Sha256));
    }
    if name.eq_ignore_ascii_case("SHASUMS512.txt") {
        return global(Some(DigestAlgorithm::Sha512));
    }
    rules
        .digest_algorithms
        .iter()
        .find(|algorithm| name.eq_ignore_ascii_case(&format!("{}sums.txt", algorithm.name())))
        .and_then(|algorithm| global(Some(*algorithm)))
}

fn release_manifest(spec: &PackageSpec, rules: &MatchRules, name: &str) -> Option<ManifestClass> {
    let version = spec.version().to_string();
    let version_tokens = [version.clone(), format!("v{version}")];

    let cursor = Cursor::new(name)
        .expect(spec.project())?
        .expect_any(rules.delimiters)?
        .expect_any(version_tokens.as_slice())?
        .expect_any(rules.delimiters)?
        .expect(GENERIC_MANIFEST)?;

    cursor.is_empty().then_some(ManifestClass {
        algorithm: None,
        scope: ChecksumScope::Global,
    })
}

fn content_manifest(base_name: &str, rules: &MatchRules, name: &str) -> Option<ManifestClass> {
    let algorithm_tokens: Vec<&str> = rules
        .digest_algorithms
        .iter()
        .map(|algorithm| algorithm.name())
        .collect();

    let cursor = Cursor::new(name)
        .expect(base_name)?
        .expect_any(rules.delimiters)?;
    let token = cursor.peek_any(algorithm_tokens.as_slice())?;
    let algorithm = DigestAlgorithm::from_name(token)?;
    let rest = cursor.expect(token)?.expect("sum.txt")?;

    rest.is_empty().then_some(ManifestClass {
        algorithm: Some(algorithm),
        scope: ChecksumScope::Content,
    })
}
