//! GitHub release installer library.
//!
//! This crate installs prebuilt packages published as GitHub release assets.
//! It is used by the `ghr-installer` CLI binary and can be driven
//! programmatically through [`install::install`].
//!
//! # Modules
//!
//! - [`checksum`] - Checksum manifests, digest algorithms and verification
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Layered installer configuration
//! - [`error`] - Top-level error type wrapping each stage's errors
//! - [`extract`] - Idempotent archive extraction
//! - [`install`] - Install orchestration
//! - [`layout`] - Cache and install directory scheme
//! - [`matcher`] - Release asset name matching
//! - [`output`] - Progress and summary output
//! - [`package_spec`] - `owner/project@version` parsing
//! - [`platform`] - Host operating system and architecture identifiers
//! - [`release`] - Release metadata, HTTP client and caching

pub mod checksum;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod install;
pub mod layout;
pub mod matcher;
pub mod output;
pub mod package_spec;
pub mod platform;
pub mod release;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
