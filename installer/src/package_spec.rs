//! Package specification parsing.
//!
//! A package specification names one tagged release as
//! `owner/project@version`, where `version` is an exact semantic version.
//! Ranges and `latest` are not accepted.

use semver::Version;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors arising from an invalid package specification string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// The owner/project portion is malformed, or no `@version` was given.
    #[error("invalid package spec \"{value}\": {reason}")]
    InvalidSpec {
        /// The rejected input.
        value: String,
        /// Description of the violated constraint.
        reason: String,
    },

    /// The version suffix is not a strict semantic version.
    #[error("invalid version \"{value}\": {reason}")]
    InvalidVersion {
        /// The rejected version string.
        value: String,
        /// The underlying semver parse error.
        reason: String,
    },
}

/// A validated `owner/project@version` triple.
///
/// # Examples
///
/// ```
/// use ghr_installer::package_spec::PackageSpec;
///
/// let spec: PackageSpec = "cli/cli@2.40.1".parse().expect("valid spec");
/// assert_eq!(spec.owner(), "cli");
/// assert_eq!(spec.project(), "cli");
/// assert_eq!(spec.tag(), "v2.40.1");
/// assert_eq!(spec.to_string(), "cli/cli@2.40.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageSpec {
    owner: String,
    project: String,
    version: Version,
}

impl PackageSpec {
    /// Parse a package specification.
    ///
    /// The string is split at the last `@`; the suffix must be a semantic
    /// version and the prefix must contain exactly one `/` separating two
    /// non-empty segments, neither of which may be `.` or `..`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::InvalidVersion`] when the version does not parse
    /// and [`SpecError::InvalidSpec`] for any other structural problem.
    pub fn parse(value: &str) -> Result<Self, SpecError> {
        let Some((owner_and_project, raw_version)) = value.rsplit_once('@') else {
            return Err(invalid_spec(value, "version not specified"));
        };

        let version = Version::parse(raw_version).map_err(|e| SpecError::InvalidVersion {
            value: raw_version.to_owned(),
            reason: e.to_string(),
        })?;

        let mut segments = owner_and_project.split('/');
        let (Some(owner), Some(project), None) = (segments.next(), segments.next(), segments.next())
        else {
            return Err(invalid_spec(value, "expected exactly one '/' in owner/project"));
        };
        if owner.is_empty() || project.is_empty() {
            return Err(invalid_spec(value, "owner and project must be non-empty"));
        }
        if [owner, project].iter().any(|segment| matches!(*segment, "." | "..")) {
            return Err(invalid_spec(value, "owner and project must not be '.' or '..'"));
        }
        if owner_and_project.contains('@') {
            return Err(invalid_spec(value, "owner and project must not contain '@'"));
        }

        Ok(Self {
            owner: owner.to_owned(),
            project: project.to_owned(),
            version,
        })
    }

    /// Return the repository owner.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Return the project (repository) name.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Return the exact release version.
    #[must_use]
    pub const fn version(&self) -> &Version {
        &self.version
    }

    /// Return the release tag literal, `v` followed by the version.
    #[must_use]
    pub fn tag(&self) -> String {
        format!("v{}", self.version)
    }
}

fn invalid_spec(value: &str, reason: &str) -> SpecError {
    SpecError::InvalidSpec {
        value: value.to_owned(),
        reason: reason.to_owned(),
    }
}

impl FromStr for PackageSpec {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for PackageSpec {
    type Error = SpecError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.project, self.version)
    }
}
