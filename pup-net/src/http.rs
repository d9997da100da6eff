use std::time::Duration;

use pup_common::config::Config;
use pup_common::error::{PupError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::validation::validate_url;

const USER_AGENT_STRING: &str = "pup plugin updater (Rust)";

/// Builds the single client used for a whole run. GitHub rejects requests
/// without a user agent, so one is always set.
pub fn build_http_client(config: &Config) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| PupError::HttpError(format!("Failed to build HTTP client: {e}")))
}

async fn get_success(client: &Client, url: &str) -> Result<Response> {
    validate_url(url)?;
    let response = client.get(url).send().await.map_err(|e| {
        debug!("HTTP request failed for {url}: {e}");
        PupError::HttpError(format!("HTTP request failed for {url}: {e}"))
    })?;
    let status = response.status();
    debug!("Received HTTP status: {} for {}", status, url);

    if status.is_success() {
        return Ok(response);
    }
    let reason = match status {
        StatusCode::NOT_FOUND => "Resource not found (404)".to_string(),
        StatusCode::FORBIDDEN => "Access forbidden (403)".to_string(),
        StatusCode::TOO_MANY_REQUESTS => "Rate limited (429)".to_string(),
        _ => format!("HTTP error {status}"),
    };
    Err(PupError::HttpError(format!("{reason} for URL {url}")))
}

/// GETs `url` and deserializes the JSON body. Any failure is reported as
/// [`PupError::SourceUnavailable`] naming the URL.
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    debug!("Fetching metadata from {}", url);
    let unavailable = |reason: String| PupError::SourceUnavailable(url.to_string(), reason);

    let response = get_success(client, url)
        .await
        .map_err(|e| unavailable(e.to_string()))?;
    let body = response
        .bytes()
        .await
        .map_err(|e| unavailable(format!("Failed to read response body: {e}")))?;
    serde_json::from_slice(&body).map_err(|e| unavailable(format!("Invalid JSON: {e}")))
}

/// GETs `url` and returns the full body.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = get_success(client, url).await?;
    let content = response
        .bytes()
        .await
        .map_err(|e| PupError::HttpError(format!("Failed to read response body bytes: {e}")))?;
    debug!("Received {} bytes from {}", content.len(), url);
    Ok(content.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_from_default_config() {
        assert!(build_http_client(&Config::default()).is_ok());
    }

    #[tokio::test]
    async fn rejects_non_http_urls_before_sending() {
        let client = build_http_client(&Config::default()).unwrap();
        let err = fetch_bytes(&client, "file:///etc/passwd").await.unwrap_err();
        assert!(matches!(err, PupError::ValidationError(_)));

        let err = fetch_json::<serde_json::Value>(&client, "not a url")
            .await
            .unwrap_err();
        assert!(matches!(err, PupError::SourceUnavailable(..)));
    }
}
