//! Host platform identifiers used when matching release asset names.
//!
//! Release assets conventionally use Go-style OS and architecture names
//! (`linux`, `darwin`, `amd64`, `arm64`), so the Rust `std::env::consts`
//! values are translated into that vocabulary.

use std::fmt;

/// Extra architecture spellings accepted for 64-bit x86 hosts.
const AMD64_ALIASES: &[&str] = &["x86_64", "x64", "64bit"];

/// The operating system and CPU architecture to resolve assets for.
///
/// # Examples
///
/// ```
/// use ghr_installer::platform::HostPlatform;
///
/// let platform = HostPlatform::new("linux", "amd64");
/// assert_eq!(platform.arch_identifiers(), vec!["amd64", "x86_64", "x64", "64bit"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostPlatform {
    os: String,
    arch: String,
}

impl HostPlatform {
    /// Create a platform from explicit identifiers.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Detect the platform of the running process.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(
            os_identifier(std::env::consts::OS),
            arch_identifier(std::env::consts::ARCH),
        )
    }

    /// Return the OS identifier.
    #[must_use]
    pub fn os(&self) -> &str {
        &self.os
    }

    /// Return the primary architecture identifier.
    #[must_use]
    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// Return every accepted architecture spelling, primary first.
    #[must_use]
    pub fn arch_identifiers(&self) -> Vec<&str> {
        let mut identifiers = vec![self.arch.as_str()];
        if self.arch == "amd64" {
            identifiers.extend_from_slice(AMD64_ALIASES);
        }
        identifiers
    }
}

impl fmt::Display for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Translate a Rust OS name into its release-asset spelling.
#[must_use]
pub fn os_identifier(rust_os: &str) -> &str {
    match rust_os {
        "macos" => "darwin",
        other => other,
    }
}

/// Translate a Rust architecture name into its release-asset spelling.
#[must_use]
pub fn arch_identifier(rust_arch: &str) -> &str {
    match rust_arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        other => other,
    }
}
