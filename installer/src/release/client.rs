//! Remote release API boundary.
//!
//! [`ReleaseClient`] abstracts the two network operations the installer
//! needs, so the pipeline can be exercised with mocks and stubs. The
//! production implementation, [`GithubClient`], talks to the GitHub REST API
//! through a blocking `ureq` agent.

use super::model::ReleaseMetadata;
use std::path::Path;
use std::time::Duration;

/// Media type requested from the GitHub REST API.
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// User agent sent with every request.
const USER_AGENT: &str = concat!("ghr-installer/", env!("CARGO_PKG_VERSION"));

/// Trait for the remote release service.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use ghr_installer::release::client::GithubClient;
///
/// let client = GithubClient::new("https://api.github.com", None, Duration::from_secs(30));
/// assert_eq!(
///     client.release_url("acme", "tool", "v1.0.0"),
///     "https://api.github.com/repos/acme/tool/releases/tags/v1.0.0"
/// );
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseClient {
    /// Fetch the release listing published under `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::NotFound`] when the release does not exist,
    /// and another [`DownloadError`] when the request or decoding fails.
    fn get_release_by_tag(
        &self,
        owner: &str,
        project: &str,
        tag: &str,
    ) -> Result<ReleaseMetadata, DownloadError>;

    /// Stream the body of `url` into the file at `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the file cannot be written.
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// Errors arising from release API and asset requests.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("request failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested release or asset does not exist (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response from {url}: {reason}")]
    InvalidResponse {
        /// The URL whose response was malformed.
        url: String,
        /// Description of the decoding failure.
        reason: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// Release client backed by the GitHub REST API.
pub struct GithubClient {
    agent: ureq::Agent,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// Create a client for the API rooted at `api_url`.
    ///
    /// Only the connection phase is bounded by `connect_timeout`; transfers
    /// of large assets are never cut short.
    #[must_use]
    pub fn new(api_url: &str, token: Option<String>, connect_timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(connect_timeout))
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            api_url: api_url.trim_end_matches('/').to_owned(),
            token,
        }
    }

    /// Build the "release by tag" endpoint URL.
    #[must_use]
    pub fn release_url(&self, owner: &str, project: &str, tag: &str) -> String {
        format!(
            "{}/repos/{owner}/{project}/releases/tags/{tag}",
            self.api_url
        )
    }

    fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }
}

impl ReleaseClient for GithubClient {
    fn get_release_by_tag(
        &self,
        owner: &str,
        project: &str,
        tag: &str,
    ) -> Result<ReleaseMetadata, DownloadError> {
        let url = self.release_url(owner, project, tag);
        let mut request = self.agent.get(&url).header("Accept", GITHUB_ACCEPT);
        if let Some(authorization) = self.authorization() {
            request = request.header("Authorization", authorization);
        }

        let response = request.call().map_err(|e| map_ureq_error(&url, &e))?;
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| DownloadError::Http {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        decode_release(&url, &body)
    }

    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut file = std::fs::File::create(dest)?;
        std::io::copy(&mut response.into_body().as_reader(), &mut file)?;
        file.sync_all()?;
        Ok(())
    }
}

/// Decode a release listing from the JSON body served at `url`.
fn decode_release(url: &str, body: &str) -> Result<ReleaseMetadata, DownloadError> {
    serde_json::from_str(body).map_err(|e| DownloadError::InvalidResponse {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn client(api_url: &str, token: Option<&str>) -> GithubClient {
        GithubClient::new(api_url, token.map(str::to_owned), Duration::from_secs(5))
    }

    #[rstest]
    #[case::plain("https://api.github.com")]
    #[case::trailing_slash("https://api.github.com/")]
    fn release_url_targets_tag_endpoint(#[case] api_url: &str) {
        assert_eq!(
            client(api_url, None).release_url("owner", "project", "v1.2.3"),
            "https://api.github.com/repos/owner/project/releases/tags/v1.2.3"
        );
    }

    #[test]
    fn enterprise_api_root_is_respected() {
        let url = client("https://ghe.example.com/api/v3", None).release_url("o", "p", "v0.1.0");
        assert_eq!(url, "https://ghe.example.com/api/v3/repos/o/p/releases/tags/v0.1.0");
    }

    #[rstest]
    #[case::anonymous(None, None)]
    #[case::token(Some("secret"), Some("Bearer secret"))]
    fn authorization_header_follows_token(
        #[case] token: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(client("https://api.github.com", token).authorization().as_deref(), expected);
    }

    #[test]
    fn user_agent_names_the_installer() {
        assert!(USER_AGENT.starts_with("ghr-installer/"));
    }

    #[test]
    fn decode_release_reads_assets() {
        let body = r#"{
            "tag_name": "v1.0.0",
            "assets": [
                {"name": "tool_1.0.0_linux_amd64.tar.gz", "browser_download_url": "https://example.test/a"}
            ]
        }"#;
        let release = decode_release("https://example.test/release", body).expect("decoded");
        assert_eq!(release.tag_name, "v1.0.0");
        assert_eq!(
            release.asset_names().collect::<Vec<_>>(),
            vec!["tool_1.0.0_linux_amd64.tar.gz"]
        );
    }

    #[test]
    fn decode_release_rejects_malformed_body() {
        let err = decode_release("https://example.test/release", "<html>").expect_err("rejected");
        assert!(matches!(err, DownloadError::InvalidResponse { .. }));
    }

    #[test]
    fn map_ureq_error_maps_404_to_not_found() {
        let err = ureq::Error::StatusCode(404);
        let mapped = map_ureq_error("https://example.test/release", &err);
        assert!(matches!(mapped, DownloadError::NotFound { .. }));
    }

    #[test]
    fn map_ureq_error_maps_other_status_to_http_error() {
        let err = ureq::Error::StatusCode(502);
        let mapped = map_ureq_error("https://example.test/release", &err);
        assert!(matches!(mapped, DownloadError::Http { .. }));
    }
}
