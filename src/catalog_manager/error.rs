use crate::catalog_store::ValidationError;
use crate::media::{CoverFileError, CoverIngestError};
use thiserror::Error;

/// Errors returned by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Cannot delete author: {reason} ({dependent_books} book(s))")]
    Integrity {
        reason: &'static str,
        dependent_books: usize,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CatalogError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<CoverFileError> for CatalogError {
    fn from(err: CoverFileError) -> Self {
        CatalogError::Storage(err.into())
    }
}

impl From<CoverIngestError> for CatalogError {
    fn from(err: CoverIngestError) -> Self {
        match err {
            CoverIngestError::Validation(e) => CatalogError::Validation(e),
            CoverIngestError::File(e) => e.into(),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
