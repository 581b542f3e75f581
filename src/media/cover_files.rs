//! Cover files on disk.
//!
//! Uploaded covers live flat in a single directory, named `<uuid>.<ext>`.
//! Books only ever store the bare file name; every path is rebuilt here and
//! anything that is not a bare name is refused.

use crate::catalog_store::CoverMimeType;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Errors that can occur while handling cover files.
#[derive(Debug, Error)]
pub enum CoverFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid cover file name: {0}")]
    InvalidFileName(String),
}

/// Directory of stored cover files.
#[derive(Debug, Clone)]
pub struct CoverFileStore {
    dir: PathBuf,
}

impl CoverFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Initialize the store (creates the covers directory).
    pub async fn init(&self) -> Result<(), CoverFileError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write a new cover file and return its name.
    pub async fn save(&self, mime: CoverMimeType, data: &[u8]) -> Result<String, CoverFileError> {
        let file_name = format!("{}.{}", Uuid::new_v4(), mime.extension());
        let path = self.dir.join(&file_name);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;
        let written = async {
            file.write_all(data).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            discard_partial_write(&path).await;
            return Err(e.into());
        }

        debug!("Stored cover file {} ({} bytes)", file_name, data.len());
        Ok(file_name)
    }

    /// Read a stored cover file.
    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>, CoverFileError> {
        let path = self.path_for(file_name)?;
        Ok(fs::read(path).await?)
    }

    /// Remove a stored cover file. A file that is already gone is not an
    /// error.
    pub async fn remove(&self, file_name: &str) -> Result<(), CoverFileError> {
        let path = self.path_for(file_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed cover file {}", file_name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Path of a stored cover, refusing anything but a bare file name.
    pub fn path_for(&self, file_name: &str) -> Result<PathBuf, CoverFileError> {
        Ok(self.dir.join(check_file_name(file_name)?))
    }
}

fn check_file_name(file_name: &str) -> Result<&str, CoverFileError> {
    let bare = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n == file_name);

    if !bare
        || file_name.contains('\0')
        || file_name.contains('\\')
        || file_name.starts_with('.')
    {
        return Err(CoverFileError::InvalidFileName(file_name.to_string()));
    }
    Ok(file_name)
}

/// Remove a file left behind by a failed write. Failures are logged only.
async fn discard_partial_write(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        warn!("Failed to remove partially written cover {:?}: {}", path, e);
    }
}
