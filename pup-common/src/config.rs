// pup-common/src/config.rs
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::catalog::{default_catalog, RawCatalogEntry};
use super::error::{PupError, Result};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "pup.toml";

const DEFAULT_PLUGIN_DIR: &str = "plugins";
const DEFAULT_LEDGER_FILE: &str = "plugin_versions.json";
const DEFAULT_LOG_FILE: &str = "plugin_updater.log";
const DEFAULT_MARKETPLACE_API_URL: &str = "https://api.spiget.org/v2";
const DEFAULT_RELEASE_API_URL: &str = "https://api.github.com/repos";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub plugin_dir: PathBuf,
    pub ledger_file: PathBuf,
    pub log_file: PathBuf,
    /// Base of the Spiget API, without trailing slash.
    pub marketplace_api_url: String,
    /// Base of the GitHub `repos` API, without trailing slash.
    pub release_api_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub catalog: Vec<RawCatalogEntry>,
}

/// On-disk shape of `pup.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    plugin_dir: Option<PathBuf>,
    ledger_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
    marketplace_api_url: Option<String>,
    release_api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
    #[serde(rename = "plugin")]
    catalog: Option<Vec<RawCatalogEntry>>,
}

impl Config {
    /// Loads configuration from `path`, or from `pup.toml` in the working
    /// directory if it exists, falling back to built-in defaults. Environment
    /// overrides are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        debug!("Loading pup configuration");

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    debug!(
                        "No {} found, using built-in defaults",
                        DEFAULT_CONFIG_FILE
                    );
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| env::var(key).ok());
        config.validate()?;
        debug!("Configuration loaded successfully.");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            PupError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| PupError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| PupError::Config(e.to_string()))?;
        let defaults = Self::default();
        Ok(Self {
            plugin_dir: file.plugin_dir.unwrap_or(defaults.plugin_dir),
            ledger_file: file.ledger_file.unwrap_or(defaults.ledger_file),
            log_file: file.log_file.unwrap_or(defaults.log_file),
            marketplace_api_url: file
                .marketplace_api_url
                .unwrap_or(defaults.marketplace_api_url),
            release_api_url: file.release_api_url.unwrap_or(defaults.release_api_url),
            request_timeout_secs: file
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
            connect_timeout_secs: file
                .connect_timeout_secs
                .unwrap_or(defaults.connect_timeout_secs),
            catalog: file.catalog.unwrap_or(defaults.catalog),
        })
    }

    /// Applies `PUP_PLUGIN_DIR`, `PUP_LEDGER_FILE` and `PUP_LOG_FILE`.
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(dir) = var("PUP_PLUGIN_DIR") {
            debug!("PUP_PLUGIN_DIR overrides plugin directory: {}", dir);
            self.plugin_dir = PathBuf::from(dir);
        }
        if let Some(file) = var("PUP_LEDGER_FILE") {
            debug!("PUP_LEDGER_FILE overrides ledger file: {}", file);
            self.ledger_file = PathBuf::from(file);
        }
        if let Some(file) = var("PUP_LOG_FILE") {
            debug!("PUP_LOG_FILE overrides log file: {}", file);
            self.log_file = PathBuf::from(file);
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("marketplace_api_url", &self.marketplace_api_url),
            ("release_api_url", &self.release_api_url),
        ] {
            let url = Url::parse(value)
                .map_err(|e| PupError::Config(format!("{key} '{value}' is not a URL: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(PupError::Config(format!(
                    "{key} must use http or https, got '{}'",
                    url.scheme()
                )));
            }
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(PupError::Config(
                "request and connect timeouts must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_file
    }

    pub fn log_path(&self) -> &Path {
        &self.log_file
    }

    pub fn plugin_path(&self, file_name: &str) -> PathBuf {
        self.plugin_dir.join(file_name)
    }

    pub fn marketplace_api(&self) -> &str {
        self.marketplace_api_url.trim_end_matches('/')
    }

    pub fn release_api(&self) -> &str {
        self.release_api_url.trim_end_matches('/')
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plugin_dir: PathBuf::from(DEFAULT_PLUGIN_DIR),
            ledger_file: PathBuf::from(DEFAULT_LEDGER_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            marketplace_api_url: DEFAULT_MARKETPLACE_API_URL.to_string(),
            release_api_url: DEFAULT_RELEASE_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            catalog: default_catalog(),
        }
    }
}
