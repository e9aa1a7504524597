//! Release listing types.
//!
//! Field names follow the GitHub REST representation so that the API
//! response and the persisted cache file share one schema.

use serde::{Deserialize, Serialize};

/// One downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// The asset filename.
    pub name: String,
    /// Direct download URL for the asset bytes.
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

impl AssetDescriptor {
    /// Create a descriptor from a name and download URL.
    #[must_use]
    pub fn new(name: impl Into<String>, download_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            download_url: download_url.into(),
        }
    }
}

/// The asset listing of one tagged release, in API response order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    /// The tag the release was published under.
    #[serde(default)]
    pub tag_name: String,
    /// Every asset attached to the release.
    #[serde(default)]
    pub assets: Vec<AssetDescriptor>,
}

impl ReleaseMetadata {
    /// Iterate over asset names in listing order.
    pub fn asset_names(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|asset| asset.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_github_release_payload() {
        let json = r#"{
            "id": 1,
            "tag_name": "v1.2.3",
            "draft": false,
            "assets": [
                {"id": 7, "name": "tool_1.2.3_linux_amd64.tar.gz",
                 "size": 10,
                 "browser_download_url": "https://example.test/a.tar.gz"}
            ]
        }"#;
        let release: ReleaseMetadata = serde_json::from_str(json).expect("valid payload");
        assert_eq!(release.tag_name, "v1.2.3");
        assert_eq!(
            release.assets,
            vec![AssetDescriptor::new(
                "tool_1.2.3_linux_amd64.tar.gz",
                "https://example.test/a.tar.gz"
            )]
        );
    }

    #[test]
    fn serializes_with_github_field_names() {
        let release = ReleaseMetadata {
            tag_name: "v1.0.0".to_owned(),
            assets: vec![AssetDescriptor::new("a.zip", "https://example.test/a.zip")],
        };
        let json = serde_json::to_string(&release).expect("serializes");
        assert!(json.contains("\"browser_download_url\""));
    }

    #[test]
    fn missing_assets_defaults_to_empty() {
        let release: ReleaseMetadata =
            serde_json::from_str(r#"{"tag_name":"v1.0.0"}"#).expect("valid payload");
        assert!(release.assets.is_empty());
        assert_eq!(release.asset_names().count(), 0);
    }
}
