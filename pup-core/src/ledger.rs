// pup-core/src/ledger.rs
//! The version ledger: which version of each plugin file was last fetched.
//!
//! The ledger is read once when a run starts and written back once when it
//! ends. Nothing is persisted in between, so a crash mid-run simply means the
//! next run sees the old versions and fetches those files again.

use std::collections::BTreeMap;
use std::path::PathBuf;

use pup_aio::{is_file, read_json_sync, write_json_sync};
use pup_common::error::{PupError, Result};
use tracing::debug;

#[derive(Debug)]
pub struct VersionLedger {
    path: PathBuf,
    versions: BTreeMap<String, u64>,
}

impl VersionLedger {
    /// Reads the ledger at `path`, creating an empty one if the file does not
    /// exist yet. A file that exists but is not a JSON object of file name to
    /// non-negative integer is a [`PupError::Persistence`] error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if is_file(&path) {
            let versions: BTreeMap<String, u64> = read_json_sync(&path).map_err(|e| {
                PupError::Persistence(format!("{} is not a valid version file: {}", path.display(), e))
            })?;
            debug!(
                "Loaded {} version records from {}",
                versions.len(),
                path.display()
            );
            return Ok(Self { path, versions });
        }

        if path.exists() {
            return Err(PupError::Persistence(format!(
                "{} exists but is not a file",
                path.display()
            )));
        }

        debug!("No version file at {}, creating one", path.display());
        let ledger = Self {
            path,
            versions: BTreeMap::new(),
        };
        ledger.flush()?;
        Ok(ledger)
    }

    pub fn get(&self, file_name: &str) -> Option<u64> {
        self.versions.get(file_name).copied()
    }

    /// Records `version` for `file_name` in memory only; see [`Self::flush`].
    pub fn set(&mut self, file_name: &str, version: u64) {
        self.versions.insert(file_name.to_string(), version);
    }

    /// Overwrites the ledger file with the full in-memory map.
    pub fn flush(&self) -> Result<()> {
        debug!(
            "Writing {} version records to {}",
            self.versions.len(),
            self.path.display()
        );
        write_json_sync(&self.path, &self.versions).map_err(|e| {
            PupError::Persistence(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    pub fn versions(&self) -> &BTreeMap<String, u64> {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn missing_file_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugin_versions.json");

        let ledger = VersionLedger::load(&path).unwrap();

        assert!(ledger.is_empty());
        assert!(path.is_file());
        assert_eq!(VersionLedger::load(&path).unwrap().len(), 0);
    }

    #[test]
    fn set_is_not_persisted_until_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugin_versions.json");

        let mut ledger = VersionLedger::load(&path).unwrap();
        ledger.set("LuckPerms.jar", 1050);
        assert_eq!(ledger.get("LuckPerms.jar"), Some(1050));
        assert_eq!(VersionLedger::load(&path).unwrap().get("LuckPerms.jar"), None);

        ledger.flush().unwrap();
        assert_eq!(VersionLedger::load(&path).unwrap().get("LuckPerms.jar"), Some(1050));
    }

    #[test]
    fn set_overwrites_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = VersionLedger::load(dir.path().join("v.json")).unwrap();
        ledger.set("A.jar", 1);
        ledger.set("A.jar", 2);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("A.jar"), Some(2));
    }

    #[test]
    fn load_after_flush_reproduces_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.json");

        let mut ledger = VersionLedger::load(&path).unwrap();
        ledger.set("EssentialsX.jar", 1520);
        ledger.set("EssentialsXSpawn.jar", 1520);
        ledger.set("TAB.jar", 170_000_123);
        ledger.flush().unwrap();

        let reloaded = VersionLedger::load(&path).unwrap();
        assert_eq!(reloaded.versions(), ledger.versions());
    }

    #[test]
    fn repeated_flush_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.json");

        let mut ledger = VersionLedger::load(&path).unwrap();
        ledger.set("b.jar", 2);
        ledger.set("a.jar", 1);
        ledger.flush().unwrap();
        let first = fs::read(&path).unwrap();
        ledger.flush().unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn reads_compact_legacy_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.json");
        fs::write(&path, r#"{"LuckPerms.jar": 1000, "Vault.jar": 344}"#).unwrap();

        let ledger = VersionLedger::load(&path).unwrap();
        assert_eq!(ledger.get("LuckPerms.jar"), Some(1000));
        assert_eq!(ledger.get("Vault.jar"), Some(344));
    }

    #[test]
    fn corrupt_file_is_a_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.json");

        for content in ["", "[1, 2]", r#"{"A.jar": "new"}"#, r#"{"A.jar": -1}"#] {
            fs::write(&path, content).unwrap();
            let err = VersionLedger::load(&path).unwrap_err();
            assert!(
                matches!(err, PupError::Persistence(_)),
                "{content:?} gave {err:?}"
            );
        }
        // The corrupt file is left as it was.
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"A.jar": -1}"#);
    }

    #[test]
    fn directory_in_place_of_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = VersionLedger::load(dir.path()).unwrap_err();
        assert!(matches!(err, PupError::Persistence(_)));
    }
}
