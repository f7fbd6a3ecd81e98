//! Release URL parsing and GitHub API interaction.

use crate::types::GitHubRelease;
use anyhow::Result;
use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("'{0}' is not a GitHub release URL (expected github.com/<owner>/<repo>/releases/tag/<tag>)")]
    UrlMismatch(String),
    #[error("Release tag '{tag}' not found in {owner}/{repo}")]
    TagNotFound {
        owner: String,
        repo: String,
        tag: String,
    },
    #[error("GitHub API request for {reference} failed: {status}")]
    RequestFailed {
        reference: String,
        status: StatusCode,
    },
    #[error("Release {0} has no assets attached")]
    NoAssets(String),
}

/// A release pinned by owner, repository and tag, as named in a
/// `github.com/<owner>/<repo>/releases/tag/<tag>` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRef {
    pub owner: String,
    pub repo: String,
    pub tag: String,
}

impl ReleaseRef {
    /// Parse a release reference out of a GitHub release URL.
    ///
    /// Owner and repository must be single path segments; the tag is the
    /// verbatim remainder and may itself contain slashes
    /// (e.g. 'nightly/2024-05-01').
    pub fn parse(url: &str) -> Result<Self, ReleaseError> {
        let re = regex::Regex::new(
            r"^(?:https?://)?(?:www\.)?github\.com/([^/]+)/([^/]+)/releases/tag/(.+)$",
        )
        .unwrap();

        let caps = re
            .captures(url.trim())
            .ok_or_else(|| ReleaseError::UrlMismatch(url.to_string()))?;

        Ok(ReleaseRef {
            owner: caps[1].to_string(),
            repo: caps[2].to_string(),
            tag: caps[3].to_string(),
        })
    }

    /// Build the GitHub API URL for fetching this release's metadata.
    pub fn api_url(&self) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/releases/tags/{}",
            self.owner, self.repo, self.tag
        )
    }
}

impl fmt::Display for ReleaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.tag)
    }
}

/// Fetch release metadata from the GitHub API.
///
/// A release with no assets is an error here so later stages can rely on
/// having at least one asset to look at.
pub async fn fetch_release(reference: &ReleaseRef) -> Result<GitHubRelease> {
    let url = reference.api_url();
    tracing::debug!("Fetching release metadata from: {}", url);

    let client = reqwest::Client::new();
    let response = client
        .get(&url)
        .header("Accept", "application/vnd.github.v3+json")
        .header("User-Agent", concat!("relharvest/", env!("CARGO_PKG_VERSION")))
        .send()
        .await?;

    if !response.status().is_success() {
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ReleaseError::TagNotFound {
                owner: reference.owner.clone(),
                repo: reference.repo.clone(),
                tag: reference.tag.clone(),
            }
            .into());
        }
        return Err(ReleaseError::RequestFailed {
            reference: reference.to_string(),
            status: response.status(),
        }
        .into());
    }

    let release: GitHubRelease = response.json().await?;
    tracing::debug!(
        "Release {} has {} asset(s)",
        release.tag_name,
        release.assets.len()
    );

    if release.assets.is_empty() {
        return Err(ReleaseError::NoAssets(reference.to_string()).into());
    }

    Ok(release)
}

/// Download URLs of the release's ZIP assets, in API response order.
/// Assets of any other type are silently ignored.
pub fn zip_download_urls(release: &GitHubRelease) -> Vec<String> {
    release
        .assets
        .iter()
        .filter(|asset| asset.browser_download_url.ends_with(".zip"))
        .map(|asset| asset.browser_download_url.clone())
        .collect()
}
