// pup-common/src/catalog.rs
//! Catalog entries: which plugins to track and where their files go.
//!
//! Entries are kept in their raw configuration form until the updater reaches
//! them, so a malformed entry stops the run exactly at its own position.

use std::collections::BTreeMap;
use std::fmt;
use std::ffi::OsStr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use toml::Value;
use url::Url;

use crate::error::{PupError, Result};

const MARKETPLACE_DOMAIN: &str = "spigotmc.org";
const CI_SUBDOMAIN: &str = "ci";
const SOURCE_FORGE_DOMAIN: &str = "github.com";

/// How a catalog entry is resolved, decided once from the host of its URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// SpigotMC resource page, resolved through the Spiget API.
    Marketplace,
    /// Jenkins job, resolved through `lastSuccessfulBuild`.
    ContinuousIntegration,
    /// GitHub repository, resolved through `releases/latest`.
    SourceForge,
    /// Anything else; downloaded verbatim on every run.
    Direct,
}

impl SourceKind {
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?.to_lowercase();
        let kind = if host.contains(MARKETPLACE_DOMAIN) {
            Self::Marketplace
        } else if host.split('.').next() == Some(CI_SUBDOMAIN) {
            Self::ContinuousIntegration
        } else if host.contains(SOURCE_FORGE_DOMAIN) {
            Self::SourceForge
        } else {
            Self::Direct
        };
        Some(kind)
    }

    /// Whether entries of this kind map artifact indices to file names.
    pub fn expects_indexed(&self) -> bool {
        matches!(self, Self::ContinuousIntegration | Self::SourceForge)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Marketplace => "marketplace",
            Self::ContinuousIntegration => "ci",
            Self::SourceForge => "release",
            Self::Direct => "direct",
        };
        f.write_str(name)
    }
}

/// Destination file name(s) for a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSpec {
    Single(String),
    /// Artifact index → file name. Iteration starts at the lowest index.
    Indexed(BTreeMap<usize, String>),
}

impl FileSpec {
    /// Number of files this entry contributes to the run total.
    pub fn len(&self) -> usize {
        match self {
            FileSpec::Single(_) => 1,
            FileSpec::Indexed(files) => files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The file whose ledger record gates change detection for the whole entry.
    pub fn representative(&self) -> Option<&str> {
        match self {
            FileSpec::Single(name) => Some(name),
            FileSpec::Indexed(files) => files.values().next().map(String::as_str),
        }
    }
}

/// A catalog entry as it appears in configuration, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawCatalogEntry {
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub file: Option<Value>,
}

impl RawCatalogEntry {
    pub fn single(url: &str, file: &str) -> Self {
        Self {
            url: Some(Value::String(url.to_string())),
            file: Some(Value::String(file.to_string())),
        }
    }

    pub fn indexed<'a>(url: &str, files: impl IntoIterator<Item = (usize, &'a str)>) -> Self {
        let table = files
            .into_iter()
            .map(|(index, name)| (index.to_string(), Value::String(name.to_string())))
            .collect::<toml::map::Map<_, _>>();
        Self {
            url: Some(Value::String(url.to_string())),
            file: Some(Value::Table(table)),
        }
    }

    /// Turns the raw entry into a typed one. `index` is the entry's position
    /// in the catalog and is only used for error reporting.
    pub fn validate(&self, index: usize) -> Result<CatalogEntry> {
        let malformed = |reason: String| PupError::MalformedEntry { index, reason };

        let source = match &self.url {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(malformed(format!(
                    "url must be a string, found {}",
                    other.type_str()
                )))
            }
            None => return Err(malformed("missing url".to_string())),
        };

        let parsed = Url::parse(&source)
            .map_err(|e| malformed(format!("invalid url '{source}': {e}")))?;
        let kind = SourceKind::from_url(&parsed)
            .ok_or_else(|| malformed(format!("url '{source}' has no host")))?;

        let files = match &self.file {
            Some(Value::String(name)) => {
                check_file_name(name).map_err(malformed)?;
                FileSpec::Single(name.clone())
            }
            Some(Value::Table(table)) => {
                let mut files = BTreeMap::new();
                for (key, value) in table {
                    let artifact_index = key.parse::<usize>().map_err(|_| {
                        malformed(format!("file index '{key}' is not a non-negative integer"))
                    })?;
                    let Value::String(name) = value else {
                        return Err(malformed(format!(
                            "file name for index {key} must be a string"
                        )));
                    };
                    check_file_name(name).map_err(malformed)?;
                    files.insert(artifact_index, name.clone());
                }
                if files.is_empty() {
                    return Err(malformed(format!("no files listed for '{source}'")));
                }
                FileSpec::Indexed(files)
            }
            Some(other) => {
                return Err(malformed(format!(
                    "file must be a name or an index table, found {}",
                    other.type_str()
                )))
            }
            None => return Err(malformed("missing file".to_string())),
        };

        match (&files, kind.expects_indexed()) {
            (FileSpec::Single(_), true) => Err(malformed(format!(
                "{kind} source '{source}' needs an index table of files"
            ))),
            (FileSpec::Indexed(_), false) => Err(malformed(format!(
                "{kind} source '{source}' takes a single file name"
            ))),
            _ => Ok(CatalogEntry {
                source,
                kind,
                files,
            }),
        }
    }
}

/// Plugin files live directly in the plugin directory, so a name must be a
/// single path component.
fn check_file_name(name: &str) -> std::result::Result<(), String> {
    if Path::new(name).file_name() == Some(OsStr::new(name)) {
        Ok(())
    } else {
        Err(format!("'{name}' is not a plain file name"))
    }
}

/// A validated catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub source: String,
    pub kind: SourceKind,
    pub files: FileSpec,
}

/// The catalog shipped with pup, used when no configuration file is present.
pub fn default_catalog() -> Vec<RawCatalogEntry> {
    vec![
        RawCatalogEntry::single(
            "https://www.spigotmc.org/resources/ath-peak-players-record-spigot-and-bungeecord-support.87124",
            "Ath.jar",
        ),
        RawCatalogEntry::single(
            "https://www.spigotmc.org/resources/chatty-lightweight-universal-bukkit-chat-system-solution-1-7-10-1-19.59411",
            "Chatty.jar",
        ),
        RawCatalogEntry::single("https://www.spigotmc.org/resources/chunky.81534", "Chunky.jar"),
        RawCatalogEntry::single(
            "https://www.spigotmc.org/resources/gsit-modern-sit-seat-and-chair-lay-and-crawl-plugin-1-13-x-1-19-x.62325",
            "GSit.jar",
        ),
        RawCatalogEntry::single("https://www.spigotmc.org/resources/luckperms.28140", "LuckPerms.jar"),
        RawCatalogEntry::single("https://www.spigotmc.org/resources/mycommand.22272", "MyCommand.jar"),
        RawCatalogEntry::single(
            "https://www.spigotmc.org/resources/placeholderapi.6245",
            "PlaceholderAPI.jar",
        ),
        RawCatalogEntry::single(
            "https://www.spigotmc.org/resources/skinsrestorer.2124",
            "SkinsRestorer.jar",
        ),
        RawCatalogEntry::single("https://www.spigotmc.org/resources/spark.57242", "spark.jar"),
        RawCatalogEntry::single("https://www.spigotmc.org/resources/vault.34315", "Vault.jar"),
        RawCatalogEntry::indexed(
            "https://ci.codemc.io/job/AuthMe/job/AuthMeReloaded",
            [(3, "AuthMe.jar")],
        ),
        RawCatalogEntry::indexed(
            "https://ci.ender.zone/job/EssentialsX",
            [(0, "EssentialsX.jar"), (7, "EssentialsXSpawn.jar")],
        ),
        RawCatalogEntry::indexed(
            "https://ci.athion.net/job/FastAsyncWorldEdit",
            [(0, "FastAsyncWorldEdit.jar")],
        ),
        RawCatalogEntry::indexed("https://ci.dmulloy2.net/job/ProtocolLib", [(0, "ProtocolLib.jar")]),
        RawCatalogEntry::indexed("https://github.com/NEZNAMY/TAB", [(0, "TAB.jar")]),
        RawCatalogEntry::single(
            "https://dev.bukkit.org/projects/worldguard/files/latest",
            "WorldGuard.jar",
        ),
    ]
}
