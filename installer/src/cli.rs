//! CLI argument definitions for the release installer.
//!
//! Parsing lives here so the binary stays focused on orchestration.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Install prebuilt release packages from GitHub.
#[derive(Parser, Debug)]
#[command(name = "ghr-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install prebuilt release packages from GitHub.\n\n",
    "The installer resolves a release by tag, picks the archive published for ",
    "this operating system and architecture, verifies it against the release's ",
    "checksum manifest when one exists, and unpacks it under the base directory.\n\n",
    "Release metadata and downloads are cached, so repeating an install makes no ",
    "network requests and reports `unchanged`.",
))]
#[command(after_help = concat!(
    "ENVIRONMENT:\n",
    "  GITHUB_TOKEN      Bearer token for API requests\n",
    "  GITHUB_API_URL    REST API root (overridden by --api-url)\n",
    "  RUST_LOG          Log filter (overrides -v)\n\n",
    "EXAMPLES:\n",
    "  Install a release into /opt/ghr:\n",
    "    $ ghr-installer install sharkdp/fd@10.2.0 --base-directory /opt/ghr\n\n",
    "  Use a GitHub Enterprise server:\n",
    "    $ ghr-installer install acme/tool@1.4.0 -b /opt/ghr \\\n",
    "        --api-url https://ghe.example.com/api/v3",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Install a release package.
    Install(InstallArgs),
}

/// Arguments for the install command.
#[derive(Parser, Debug, Clone)]
pub struct InstallArgs {
    /// Package to install, as `owner/project@version`.
    #[arg(value_name = "SPEC")]
    pub spec: String,

    /// Root of the metadata, download and install caches.
    #[arg(short, long, value_name = "DIR")]
    pub base_directory: Utf8PathBuf,

    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// GitHub REST API root.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        alias = "verbosity",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl InstallArgs {
    /// Log level implied by the verbosity count.
    ///
    /// # Examples
    ///
    /// ```
    /// use ghr_installer::cli::InstallArgs;
    /// use log::LevelFilter;
    ///
    /// let args = InstallArgs::new("acme/tool@1.0.0", "/opt/ghr");
    /// assert_eq!(args.log_level(), LevelFilter::Warn);
    /// ```
    #[must_use]
    pub const fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    /// Arguments for `spec` rooted at `base_directory` with every option unset.
    #[must_use]
    pub fn new(spec: impl Into<String>, base_directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            spec: spec.into(),
            base_directory: base_directory.into(),
            config: None,
            api_url: None,
            verbosity: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
