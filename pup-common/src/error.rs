use std::sync::Arc;

use thiserror::Error;

/// Exit status for configuration problems (empty or malformed catalog, bad config file).
pub const EXIT_CONFIG: u8 = 2;
/// Exit status when the version ledger cannot be read or written.
pub const EXIT_PERSISTENCE: u8 = 3;
/// Exit status after an external interrupt (128 + SIGINT).
pub const EXIT_INTERRUPTED: u8 = 130;
/// Exit status for anything else.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Error, Debug, Clone)]
pub enum PupError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Malformed catalog entry #{index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    #[error("Source unavailable '{0}': {1}")]
    SourceUnavailable(String, String),

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    DownloadError(String, String, String),

    #[error("Version ledger error: {0}")]
    Persistence(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("HttpError: {0}")]
    HttpError(String),

    #[error("IoError: {0}")]
    IoError(String),

    #[error("Interrupted")]
    Interrupted,
}

impl PupError {
    /// Process exit status for an error that reached the entry point.
    pub fn exit_code(&self) -> u8 {
        match self {
            PupError::Config(_) | PupError::MalformedEntry { .. } => EXIT_CONFIG,
            PupError::Persistence(_) => EXIT_PERSISTENCE,
            PupError::Interrupted => EXIT_INTERRUPTED,
            _ => EXIT_FAILURE,
        }
    }

    /// Errors that must stop the whole run rather than a single entry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PupError::Config(_)
                | PupError::MalformedEntry { .. }
                | PupError::Persistence(_)
                | PupError::Interrupted
        )
    }
}

impl From<std::io::Error> for PupError {
    fn from(err: std::io::Error) -> Self {
        PupError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for PupError {
    fn from(err: reqwest::Error) -> Self {
        PupError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for PupError {
    fn from(err: serde_json::Error) -> Self {
        PupError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, PupError>;
