//! CatalogStore trait definition.
//!
//! The store is a plain persistence seam: it knows nothing about
//! validation, cover files or the author deletion guard. Those live in the
//! catalog manager so that no caller can reach them by going around it.

use super::filter::{AuthorFilter, BookQuery};
use super::models::{Author, Book};
use anyhow::Result;

/// Trait for catalog storage backends.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Authors
    // =========================================================================

    /// List authors matching the filter, in store order.
    fn list_authors(&self, filter: &AuthorFilter) -> Result<Vec<Author>>;

    /// Get an author by ID.
    fn get_author(&self, id: &str) -> Result<Option<Author>>;

    /// Check if an author exists.
    fn author_exists(&self, id: &str) -> Result<bool>;

    /// Insert a new author. Fails if the ID is already taken.
    fn insert_author(&self, author: &Author) -> Result<()>;

    /// Update an existing author. Returns `false` if no such author exists.
    fn update_author(&self, author: &Author) -> Result<bool>;

    /// Delete an author by ID without any dependency check.
    /// Returns `false` if no such author exists.
    fn delete_author(&self, id: &str) -> Result<bool>;

    /// Number of books referencing the given author.
    fn count_books_by_author(&self, author_id: &str) -> Result<usize>;

    // =========================================================================
    // Books
    // =========================================================================

    /// Find books matching the query.
    fn find_books(&self, query: &BookQuery) -> Result<Vec<Book>>;

    /// Get a book by ID.
    fn get_book(&self, id: &str) -> Result<Option<Book>>;

    /// Insert a new book. `created_at` on the argument is ignored; the
    /// stored row gets the current time. Returns the assigned timestamp.
    fn insert_book(&self, book: &Book) -> Result<i64>;

    /// Update every field of an existing book except `created_at`.
    /// Returns `false` if no such book exists.
    fn update_book(&self, book: &Book) -> Result<bool>;

    /// Delete a book by ID. Returns `false` if no such book exists.
    fn delete_book(&self, id: &str) -> Result<bool>;

    // =========================================================================
    // Counts
    // =========================================================================

    fn get_authors_count(&self) -> Result<usize>;

    fn get_books_count(&self) -> Result<usize>;
}
