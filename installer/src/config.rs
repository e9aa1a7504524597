//! Installer configuration.
//!
//! Settings are layered, later sources winning:
//!
//! 1. Built-in defaults.
//! 2. An optional TOML file passed with `--config`.
//! 3. The `GITHUB_TOKEN` and `GITHUB_API_URL` environment variables.
//! 4. Command-line overrides.
//!
//! ```toml
//! api_url = "https://ghe.example.com/api/v3"
//! host = "ghe.example.com"
//! connect_timeout_secs = 10
//! ```

use crate::layout::CacheLayout;
use crate::release::client::GithubClient;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default GitHub REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default release host, used as the first cache path segment.
pub const DEFAULT_HOST: &str = "github.com";
/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding an API token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
/// Environment variable overriding the API root.
pub const API_URL_ENV: &str = "GITHUB_API_URL";

/// Errors arising while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// The underlying parse error.
        #[source]
        source: Box<toml::de::Error>,
    },
}

/// Keys accepted in the TOML configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// REST API root.
    pub api_url: Option<String>,
    /// Release host segment for cache paths.
    pub host: Option<String>,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed text or unknown keys.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Read and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source: Box::new(source),
        })
    }
}

/// Resolved installer settings.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use ghr_installer::config::{ConfigFile, InstallerConfig};
///
/// let file = ConfigFile::parse("host = \"ghe.example.com\"").expect("valid toml");
/// let config = InstallerConfig::new(Utf8PathBuf::from("/opt/ghr"))
///     .with_file(file)
///     .with_env(|_| None);
/// assert_eq!(config.host, "ghe.example.com");
/// assert_eq!(config.api_url, "https://api.github.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    /// Root of the cache and install tree.
    pub base_directory: Utf8PathBuf,
    /// REST API root.
    pub api_url: String,
    /// Release host segment for cache paths.
    pub host: String,
    /// Bearer token for API requests.
    pub token: Option<String>,
    /// Connection timeout for HTTP requests.
    pub connect_timeout: Duration,
}

impl InstallerConfig {
    /// Defaults for an installer rooted at `base_directory`.
    #[must_use]
    pub fn new(base_directory: Utf8PathBuf) -> Self {
        Self {
            base_directory,
            api_url: DEFAULT_API_URL.to_owned(),
            host: DEFAULT_HOST.to_owned(),
            token: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Load every layer: defaults, the optional file, the process
    /// environment, then the API URL override.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration file cannot be loaded.
    pub fn load(
        base_directory: Utf8PathBuf,
        config_file: Option<&Utf8Path>,
        api_url_override: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let file = config_file.map(ConfigFile::load).transpose()?.unwrap_or_default();
        Ok(Self::new(base_directory)
            .with_file(file)
            .with_env(|key| std::env::var(key).ok())
            .with_api_url(api_url_override))
    }

    /// Apply values from a configuration file.
    #[must_use]
    pub fn with_file(mut self, file: ConfigFile) -> Self {
        if let Some(api_url) = file.api_url {
            self.api_url = api_url;
        }
        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(secs) = file.connect_timeout_secs {
            self.connect_timeout = Duration::from_secs(secs);
        }
        self
    }

    /// Apply values from the environment via `lookup`; blank values are
    /// ignored.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(token) = non_blank(TOKEN_ENV) {
            self.token = Some(token);
        }
        if let Some(api_url) = non_blank(API_URL_ENV) {
            self.api_url = api_url;
        }
        self
    }

    /// Apply a command-line API URL override.
    #[must_use]
    pub fn with_api_url(mut self, api_url: Option<&str>) -> Self {
        if let Some(url) = api_url {
            url.clone_into(&mut self.api_url);
        }
        self
    }

    /// The cache layout these settings describe.
    #[must_use]
    pub fn layout(&self) -> CacheLayout {
        CacheLayout::new(self.base_directory.clone(), self.host.clone())
    }

    /// A GitHub client configured from these settings.
    #[must_use]
    pub fn client(&self) -> GithubClient {
        GithubClient::new(&self.api_url, self.token.clone(), self.connect_timeout)
    }
}
