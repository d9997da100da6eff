// pup-net/src/api.rs
//! Metadata endpoints of the supported plugin sources.
use pup_common::error::{PupError, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::http::fetch_json;
use crate::validation::validate_url;

/// `GET {spiget}/resources/{id}/versions/latest`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SpigetVersion {
    pub id: u64,
}

/// `GET {job}/lastSuccessfulBuild/api/json`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JenkinsBuild {
    pub number: u64,
    #[serde(default)]
    pub artifacts: Vec<JenkinsArtifact>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JenkinsArtifact {
    #[serde(rename = "relativePath")]
    pub relative_path: String,
}

/// `GET {github}/{owner}/{repo}/releases/latest`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GithubRelease {
    pub id: u64,
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub assets: Vec<GithubAsset>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GithubAsset {
    pub browser_download_url: String,
}

/// Numeric resource id of a SpigotMC resource page: the text after the last
/// `.` of the final path segment (`.../resources/luckperms.28140` → 28140).
pub fn resource_id(source: &str) -> Result<u64> {
    let url = validate_url(source)?;
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
        .ok_or_else(|| PupError::ValidationError(format!("'{source}' has no resource path")))?;
    let id = segment.rsplit('.').next().unwrap_or(segment);
    id.parse::<u64>().map_err(|_| {
        PupError::ValidationError(format!(
            "'{source}' does not end in a numeric resource id (found '{id}')"
        ))
    })
}

pub async fn fetch_latest_resource_version(
    client: &Client,
    api_base: &str,
    resource: u64,
) -> Result<SpigetVersion> {
    let url = format!("{api_base}/resources/{resource}/versions/latest");
    debug!("Looking up latest version of resource {}", resource);
    fetch_json(client, &url).await
}

pub fn resource_download_url(api_base: &str, resource: u64, version: u64) -> String {
    format!("{api_base}/resources/{resource}/download?version={version}")
}

pub async fn fetch_last_successful_build(client: &Client, job_url: &str) -> Result<JenkinsBuild> {
    let url = format!(
        "{}/lastSuccessfulBuild/api/json",
        job_url.trim_end_matches('/')
    );
    fetch_json(client, &url).await
}

pub fn artifact_url(job_url: &str, relative_path: &str) -> String {
    format!(
        "{}/lastSuccessfulBuild/artifact/{}",
        job_url.trim_end_matches('/'),
        relative_path.trim_start_matches('/')
    )
}

/// `repository` is `owner/repo`.
pub async fn fetch_latest_release(
    client: &Client,
    api_base: &str,
    repository: &str,
) -> Result<GithubRelease> {
    let url = format!("{api_base}/{repository}/releases/latest");
    fetch_json(client, &url).await
}
