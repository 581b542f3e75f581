//! Catalog Manager - the operations callers perform on authors and books.
//!
//! Every write goes through here: field validation, the author existence
//! check, cover intake, the store write and the cleanup of cover files the
//! write made obsolete. The author delete path runs the deletion guard.

use super::error::{CatalogError, CatalogResult};
use crate::catalog_store::validation::{
    validate_author_name, validate_book_fields, validate_cover_presence,
};
use crate::catalog_store::{
    Author, AuthorDeletion, AuthorDeletionGuard, AuthorFilter, Book, BookFields, BookFilter,
    BookQuery, BookSearchParams, CatalogStore, CoverBytes, CoverImage, CoverPolicy,
    ResolvedBook, ValidationError,
};
use crate::media::{CoverAllowlist, CoverFileError, CoverFileStore, CoverIngestion, CoverPayload};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const AUTHOR_HAS_BOOKS: &str = "author still has associated books";

/// Configuration for the CatalogManager.
#[derive(Debug, Clone)]
pub struct CatalogManagerConfig {
    /// Directory for uploaded cover files.
    pub covers_dir: PathBuf,
    /// Maximum uploaded cover size in bytes.
    pub max_cover_size_bytes: u64,
    /// Whether new books must come with a cover.
    pub cover_policy: CoverPolicy,
    /// Accept `image/jpg` as JPEG.
    pub accept_jpg_alias: bool,
    /// Number of books returned by `recent_books`.
    pub recent_books_limit: usize,
}

impl Default for CatalogManagerConfig {
    fn default() -> Self {
        Self {
            covers_dir: PathBuf::from("covers"),
            max_cover_size_bytes: 5 * 1024 * 1024, // 5 MB
            cover_policy: CoverPolicy::Optional,
            accept_jpg_alias: false,
            recent_books_limit: 10,
        }
    }
}

pub struct CatalogManager {
    store: Arc<dyn CatalogStore>,
    covers: CoverIngestion,
    cover_policy: CoverPolicy,
    recent_books_limit: usize,
}

impl CatalogManager {
    pub fn new(store: Arc<dyn CatalogStore>, config: CatalogManagerConfig) -> Self {
        let files = Arc::new(CoverFileStore::new(&config.covers_dir));
        let covers = CoverIngestion::new(
            files,
            CoverAllowlist::new(config.accept_jpg_alias),
            config.max_cover_size_bytes,
        );

        Self {
            store,
            covers,
            cover_policy: config.cover_policy,
            recent_books_limit: config.recent_books_limit,
        }
    }

    /// Initialize the manager (creates the covers directory).
    pub async fn init(&self) -> Result<()> {
        self.covers.files().init().await?;
        Ok(())
    }

    // =========================================================================
    // Authors
    // =========================================================================

    pub fn list_authors(&self, name_filter: Option<&str>) -> CatalogResult<Vec<Author>> {
        Ok(self
            .store
            .list_authors(&AuthorFilter::from_name(name_filter))?)
    }

    pub fn create_author(&self, name: &str) -> CatalogResult<Author> {
        let author = Author {
            id: Uuid::new_v4().to_string(),
            name: validate_author_name(name)?,
        };
        self.store.insert_author(&author)?;
        info!("Created author {} ({})", author.id, author.name);
        Ok(author)
    }

    pub fn get_author(&self, id: &str) -> CatalogResult<Author> {
        self.store
            .get_author(id)?
            .ok_or_else(|| CatalogError::not_found("author", id))
    }

    pub fn update_author(&self, id: &str, name: &str) -> CatalogResult<Author> {
        let mut author = self.get_author(id)?;
        author.name = validate_author_name(name)?;
        if !self.store.update_author(&author)? {
            return Err(CatalogError::not_found("author", id));
        }
        debug!("Renamed author {} to {}", author.id, author.name);
        Ok(author)
    }

    /// Delete an author, refusing while any book still references it.
    pub fn delete_author(&self, id: &str) -> CatalogResult<()> {
        if !self.store.author_exists(id)? {
            return Err(CatalogError::not_found("author", id));
        }

        match AuthorDeletionGuard::new(self.store.as_ref()).delete(id)? {
            AuthorDeletion::Deleted => {
                info!("Deleted author {}", id);
                Ok(())
            }
            AuthorDeletion::Blocked { dependent_books } => Err(CatalogError::Integrity {
                reason: AUTHOR_HAS_BOOKS,
                dependent_books,
            }),
            AuthorDeletion::Vanished => Err(CatalogError::not_found("author", id)),
        }
    }

    // =========================================================================
    // Books
    // =========================================================================

    pub fn list_books(&self, params: &BookSearchParams) -> CatalogResult<Vec<Book>> {
        let filter = BookFilter::from_params(params)?;
        Ok(self.store.find_books(&BookQuery::filtered(filter))?)
    }

    /// Most recently created books, newest first.
    pub fn recent_books(&self) -> CatalogResult<Vec<Book>> {
        Ok(self
            .store
            .find_books(&BookQuery::recent(self.recent_books_limit))?)
    }

    pub async fn create_book(
        &self,
        fields: BookFields,
        cover: Option<CoverPayload>,
    ) -> CatalogResult<Book> {
        let author_id = self.check_book_fields(&fields)?;
        let cover = cover.filter(|c| !c.is_empty());
        validate_cover_presence(cover.is_some(), self.cover_policy)?;

        let intake = self.covers.intake(cover).await?;
        let book = Book {
            id: Uuid::new_v4().to_string(),
            title: fields.title.trim().to_string(),
            author_id,
            published_on: published_on(&fields)?,
            page_count: fields.page_count,
            description: fields.normalized_description(),
            cover: None,
            created_at: 0,
        };

        let book = self
            .covers
            .persist_with(intake, |cover| -> CatalogResult<Book> {
                let mut book = book;
                book.cover = cover;
                book.created_at = self.store.insert_book(&book)?;
                Ok(book)
            })
            .await?;

        info!("Created book {} ({})", book.id, book.title);
        Ok(book)
    }

    pub fn get_book(&self, id: &str) -> CatalogResult<ResolvedBook> {
        let book = self
            .store
            .get_book(id)?
            .ok_or_else(|| CatalogError::not_found("book", id))?;
        let author = self.store.get_author(&book.author_id)?;
        if author.is_none() {
            warn!("Book {} references missing author {}", book.id, book.author_id);
        }
        Ok(ResolvedBook { book, author })
    }

    /// Replace every editable field of a book. The cover is only replaced
    /// when a new one is supplied.
    pub async fn update_book(
        &self,
        id: &str,
        fields: BookFields,
        cover: Option<CoverPayload>,
    ) -> CatalogResult<Book> {
        let existing = self
            .store
            .get_book(id)?
            .ok_or_else(|| CatalogError::not_found("book", id))?;
        let author_id = self.check_book_fields(&fields)?;

        let intake = self.covers.intake(cover.filter(|c| !c.is_empty())).await?;
        let book = Book {
            id: existing.id.clone(),
            title: fields.title.trim().to_string(),
            author_id,
            published_on: published_on(&fields)?,
            page_count: fields.page_count,
            description: fields.normalized_description(),
            cover: existing.cover.clone(),
            created_at: existing.created_at,
        };

        let book = self
            .covers
            .persist_with(intake, |cover| -> CatalogResult<Book> {
                let mut book = book;
                if cover.is_some() {
                    book.cover = cover;
                }
                if !self.store.update_book(&book)? {
                    return Err(CatalogError::not_found("book", id));
                }
                Ok(book)
            })
            .await?;

        if let Some(old_file) = existing.cover.as_ref().and_then(CoverImage::file_name) {
            if book.cover.as_ref().and_then(CoverImage::file_name) != Some(old_file) {
                self.remove_cover_file(old_file).await;
            }
        }

        debug!("Updated book {}", book.id);
        Ok(book)
    }

    pub async fn delete_book(&self, id: &str) -> CatalogResult<()> {
        let existing = self
            .store
            .get_book(id)?
            .ok_or_else(|| CatalogError::not_found("book", id))?;
        if !self.store.delete_book(id)? {
            return Err(CatalogError::not_found("book", id));
        }

        if let Some(file_name) = existing.cover.as_ref().and_then(CoverImage::file_name) {
            self.remove_cover_file(file_name).await;
        }
        info!("Deleted book {}", id);
        Ok(())
    }

    /// The bytes of a book's cover, wherever they are kept.
    pub async fn get_book_cover(&self, id: &str) -> CatalogResult<CoverBytes> {
        let book = self
            .store
            .get_book(id)?
            .ok_or_else(|| CatalogError::not_found("book", id))?;

        match book.cover {
            None => Err(CatalogError::not_found("cover", id)),
            Some(CoverImage::Inline { mime, data }) => Ok(CoverBytes { mime, data }),
            Some(CoverImage::Stored { mime, file_name }) => {
                match self.covers.files().read(&file_name).await {
                    Ok(data) => Ok(CoverBytes { mime, data }),
                    Err(CoverFileError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                        warn!("Cover file {} of book {} is missing", file_name, id);
                        Err(CatalogError::not_found("cover", id))
                    }
                    Err(e) => Err(e.into()),
                }
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Field validation followed by the author existence check. Returns the
    /// trimmed author id.
    fn check_book_fields(&self, fields: &BookFields) -> CatalogResult<String> {
        validate_book_fields(fields)?;
        let author_id = fields.author_id.as_deref().unwrap_or_default().trim();
        if !self.store.author_exists(author_id)? {
            return Err(ValidationError::MissingAuthor {
                author_id: Some(author_id.to_string()),
            }
            .into());
        }
        Ok(author_id.to_string())
    }

    async fn remove_cover_file(&self, file_name: &str) {
        if let Err(e) = self.covers.files().remove(file_name).await {
            warn!("Failed to remove cover file {}: {}", file_name, e);
        }
    }
}

fn published_on(fields: &BookFields) -> CatalogResult<chrono::NaiveDate> {
    fields
        .published_on
        .ok_or_else(|| ValidationError::MissingPublishDate.into())
}
