/*
File: pup-aio/src/fs.rs
Purpose: Filesystem primitives shared by the ledger and the downloader.
*/
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use pup_common::error::{PupError, Result};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

/// Checks if a path points to a regular file (resolving symlinks).
pub fn is_file(path: &Path) -> bool {
    path.is_file()
}

/// Creates a directory and all its parent components if they are missing.
pub fn create_dir_all(path: &Path) -> Result<()> {
    debug!("Creating directory recursively: {}", path.display());
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed create dir {}: {}", path.display(), e);
        PupError::from(e)
    })
}

/// Reads the entire contents of a file into a byte vector.
pub fn read_to_bytes(path: &Path) -> Result<Vec<u8>> {
    debug!("Reading file to bytes: {}", path.display());
    fs::read(path).map_err(|e| {
        error!("Failed read file {}: {}", path.display(), e);
        PupError::from(e)
    })
}

/// Directory a file lives in; bare file names resolve to the working directory.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Atomically writes data to a file using a temporary file in the same directory.
pub fn atomic_write_file(original_path: &Path, content: &[u8]) -> Result<()> {
    let dir = parent_dir(original_path);
    create_dir_all(&dir)?;

    let mut temp_file = NamedTempFile::new_in(&dir)?;
    let temp_path = temp_file.path().to_path_buf();

    debug!(
        "Atomically writing {} bytes to {} via temp file {}",
        content.len(),
        original_path.display(),
        temp_path.display()
    );

    temp_file.write_all(content)?;
    temp_file.flush()?;
    temp_file.as_file().sync_all()?;

    temp_file.persist(original_path).map_err(|e| {
        error!(
            "Failed to persist temporary file {} over {}: {}",
            temp_path.display(),
            original_path.display(),
            e.error
        );
        PupError::Io(Arc::new(e.error))
    })?;

    Ok(())
}

/// Writes downloaded content to a hidden `.<name>.*.download` file next to
/// `final_path`, then renames it into place. The temporary file is removed if
/// the write fails or the future is dropped before it finishes.
pub async fn replace_file_async(final_path: &Path, content: &[u8]) -> Result<()> {
    let file_name = final_path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| {
            PupError::IoError(format!("No file name in path {}", final_path.display()))
        })?;
    let temp_file = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".download")
        .tempfile_in(parent_dir(final_path))
        .map_err(|e| {
            PupError::IoError(format!(
                "Failed to create temporary file for {}: {}",
                final_path.display(),
                e
            ))
        })?;
    let temp_path = temp_file.path().to_path_buf();
    debug!("Writing download to temporary path: {}", temp_path.display());

    let write_failed = |e: io::Error| {
        PupError::IoError(format!("Failed to write {}: {}", temp_path.display(), e))
    };
    let mut writer = tokio::fs::File::from_std(temp_file.reopen().map_err(write_failed)?);
    writer.write_all(content).await.map_err(write_failed)?;
    writer.flush().await.map_err(write_failed)?;
    drop(writer);

    temp_file.persist(final_path).map_err(|e| {
        PupError::IoError(format!(
            "Failed to move temp file {} to {}: {}",
            temp_path.display(),
            final_path.display(),
            e.error
        ))
    })?;
    debug!("Moved download to final location: {}", final_path.display());
    Ok(())
}
