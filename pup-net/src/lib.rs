// pup-net/src/lib.rs
pub mod api;
pub mod http;
pub mod validation;

pub use api::{
    artifact_url, fetch_last_successful_build, fetch_latest_release,
    fetch_latest_resource_version, resource_download_url, resource_id, GithubAsset,
    GithubRelease, JenkinsArtifact, JenkinsBuild, SpigetVersion,
};
pub use http::{build_http_client, fetch_bytes, fetch_json};
pub use pup_common::{
    error::{PupError, Result},
    Config,
};
pub use validation::{repository_path, validate_url};
