// pup-net/src/validation.rs
use pup_common::error::{PupError, Result};
use url::Url;

/// Validates a URL, ensuring it uses the http or https scheme.
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| PupError::ValidationError(format!("Failed to parse URL '{url_str}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(PupError::ValidationError(format!(
            "Invalid URL scheme for '{url_str}': Must be http or https, but got '{scheme}'"
        ))),
    }
}

/// `owner/repo` from a repository page URL such as
/// `https://github.com/NEZNAMY/TAB`.
pub fn repository_path(url_str: &str) -> Result<String> {
    let url = validate_url(url_str)?;
    let mut segments = url
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some(owner), Some(repo)) => Ok(format!("{owner}/{repo}")),
        _ => Err(PupError::ValidationError(format!(
            "'{url_str}' does not name an owner/repository"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_url("https://ci.ender.zone/job/EssentialsX").is_ok());
        assert!(validate_url("http://127.0.0.1:8080/a.jar").is_ok());
        assert!(validate_url("ftp://example.org/a.jar").is_err());
    }

    #[test]
    fn extracts_owner_and_repo() {
        assert_eq!(
            repository_path("https://github.com/NEZNAMY/TAB").unwrap(),
            "NEZNAMY/TAB"
        );
        assert_eq!(
            repository_path("https://github.com/NEZNAMY/TAB/").unwrap(),
            "NEZNAMY/TAB"
        );
        assert!(repository_path("https://github.com/NEZNAMY").is_err());
    }
}
