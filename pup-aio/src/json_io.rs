// pup-aio/src/json_io.rs
use std::path::Path;

use pup_common::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Serializes `data` as pretty-printed JSON with a trailing newline and
/// atomically replaces `path` with it.
pub fn write_json_sync<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    debug!("Sync Writing JSON to: {}", path.display());
    let mut json_bytes = serde_json::to_vec_pretty(data)?;
    json_bytes.push(b'\n');
    crate::fs::atomic_write_file(path, &json_bytes)
}

pub fn read_json_sync<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!("Sync Reading JSON from: {}", path.display());
    let json_bytes = crate::fs::read_to_bytes(path)?;
    Ok(serde_json::from_slice(&json_bytes)?)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn writes_sorted_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("versions.json");
        let data = BTreeMap::from([("b.jar".to_string(), 2u64), ("a.jar".to_string(), 1u64)]);

        write_json_sync(&path, &data).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"a.jar\": 1,\n  \"b.jar\": 2\n}\n");
        let back: BTreeMap<String, u64> = read_json_sync(&path).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn read_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result: Result<BTreeMap<String, u64>> = read_json_sync(&path);
        assert!(matches!(result, Err(pup_common::PupError::Json(_))));
    }
}
