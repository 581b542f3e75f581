//! Cover ingestion.
//!
//! A cover payload goes through two steps. `intake` validates it and, for
//! uploads, writes the file to the covers directory. `persist_with` then
//! hands the resulting cover to the entity save and deletes the staged file
//! again if that save fails, so no cover file outlives a failed write.

use super::allowlist::CoverAllowlist;
use super::cover_files::{CoverFileError, CoverFileStore};
use super::inline::decode_inline_cover;
use crate::catalog_store::{CoverImage, CoverMimeType, ValidationError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// A cover as submitted with a book write.
#[derive(Debug, Clone)]
pub enum CoverPayload {
    /// JSON `{"type", "data"}` string, data base64 encoded.
    Inline(String),
    /// Raw uploaded file.
    Upload(CoverUpload),
}

impl CoverPayload {
    /// An empty inline string is the same as no cover at all.
    pub fn is_empty(&self) -> bool {
        match self {
            CoverPayload::Inline(raw) => raw.trim().is_empty(),
            CoverPayload::Upload(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoverUpload {
    pub declared_mime: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum CoverIngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to store cover file: {0}")]
    File(#[from] CoverFileError),
}

/// An accepted upload written to disk but not yet bound to a book.
#[derive(Debug, PartialEq, Eq)]
pub struct StagedCover {
    mime: CoverMimeType,
    file_name: String,
}

impl StagedCover {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    fn to_cover(&self) -> CoverImage {
        CoverImage::Stored {
            mime: self.mime,
            file_name: self.file_name.clone(),
        }
    }
}

/// Result of cover intake.
#[derive(Debug, PartialEq, Eq)]
pub enum CoverIntake {
    /// No cover to store, either none was sent or it was dropped.
    Empty,
    Inline(CoverImage),
    Staged(StagedCover),
}

impl CoverIntake {
    pub fn cover(&self) -> Option<CoverImage> {
        match self {
            CoverIntake::Empty => None,
            CoverIntake::Inline(cover) => Some(cover.clone()),
            CoverIntake::Staged(staged) => Some(staged.to_cover()),
        }
    }
}

/// Validates and stores cover payloads.
pub struct CoverIngestion {
    files: Arc<CoverFileStore>,
    allowlist: CoverAllowlist,
    max_size_bytes: u64,
}

impl CoverIngestion {
    pub fn new(files: Arc<CoverFileStore>, allowlist: CoverAllowlist, max_size_bytes: u64) -> Self {
        Self {
            files,
            allowlist,
            max_size_bytes,
        }
    }

    pub fn files(&self) -> &CoverFileStore {
        &self.files
    }

    /// Validate a payload and stage uploads on disk.
    ///
    /// Uploads are checked for type and size before anything is written.
    pub async fn intake(
        &self,
        payload: Option<CoverPayload>,
    ) -> Result<CoverIntake, CoverIngestError> {
        match payload {
            None => Ok(CoverIntake::Empty),
            Some(CoverPayload::Inline(raw)) => {
                Ok(match decode_inline_cover(&raw, &self.allowlist)? {
                    Some(cover) => CoverIntake::Inline(cover),
                    None => CoverIntake::Empty,
                })
            }
            Some(CoverPayload::Upload(upload)) => {
                let mime = self.allowlist.resolve(&upload.declared_mime).ok_or_else(|| {
                    ValidationError::UnsupportedCoverType {
                        mime: upload.declared_mime.clone(),
                    }
                })?;

                let size = upload.data.len() as u64;
                if size > self.max_size_bytes {
                    return Err(ValidationError::CoverTooLarge {
                        size,
                        max: self.max_size_bytes,
                    }
                    .into());
                }
                if size == 0 {
                    return Err(ValidationError::InvalidCoverData {
                        reason: "uploaded cover is empty".to_string(),
                    }
                    .into());
                }

                let file_name = self.files.save(mime, &upload.data).await?;
                Ok(CoverIntake::Staged(StagedCover { mime, file_name }))
            }
        }
    }

    /// Run the entity save with the intake's cover, removing a staged file
    /// when the save fails.
    pub async fn persist_with<T, E, F>(&self, intake: CoverIntake, save: F) -> Result<T, E>
    where
        F: FnOnce(Option<CoverImage>) -> Result<T, E>,
    {
        let result = save(intake.cover());
        if result.is_err() {
            if let CoverIntake::Staged(staged) = intake {
                self.discard(staged).await;
            }
        }
        result
    }

    /// Delete a staged cover that will not be used. Failures are only
    /// logged.
    pub async fn discard(&self, staged: StagedCover) {
        match self.files.remove(&staged.file_name).await {
            Ok(()) => debug!("Discarded staged cover {}", staged.file_name),
            Err(e) => warn!(
                "Failed to clean up staged cover {}: {}",
                staged.file_name, e
            ),
        }
    }
}
