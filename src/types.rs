use serde::{Deserialize, Serialize};

/// A published release as returned by the GitHub "get release by tag"
/// endpoint. Only the fields the pipeline consumes are modeled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubRelease {
    pub tag_name: String,
    // A release without attachments serves `assets: []`; some error-shaped
    // responses omit the array entirely, which must read the same way.
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
}
