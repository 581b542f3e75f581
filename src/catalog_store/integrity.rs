//! Author deletion guard.
//!
//! An author may only be removed while no book references it. The check
//! and the delete are two separate store calls, so a book created for the
//! same author in between is not seen by the check.

use super::trait_def::CatalogStore;
use anyhow::Result;
use tracing::debug;

/// Outcome of the dependency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorDeletionCheck {
    Approved,
    Blocked { dependent_books: usize },
}

/// Outcome of a guarded author deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorDeletion {
    Deleted,
    Blocked { dependent_books: usize },
    /// The check passed but the author was no longer there to delete.
    Vanished,
}

pub struct AuthorDeletionGuard<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> AuthorDeletionGuard<'a> {
    pub fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    pub fn check(&self, author_id: &str) -> Result<AuthorDeletionCheck> {
        let dependent_books = self.store.count_books_by_author(author_id)?;
        if dependent_books > 0 {
            debug!(
                "Author {} deletion blocked by {} book(s)",
                author_id, dependent_books
            );
            return Ok(AuthorDeletionCheck::Blocked { dependent_books });
        }
        Ok(AuthorDeletionCheck::Approved)
    }

    /// Run the check and delete the author only when approved.
    pub fn delete(&self, author_id: &str) -> Result<AuthorDeletion> {
        match self.check(author_id)? {
            AuthorDeletionCheck::Blocked { dependent_books } => {
                Ok(AuthorDeletion::Blocked { dependent_books })
            }
            AuthorDeletionCheck::Approved => {
                if self.store.delete_author(author_id)? {
                    Ok(AuthorDeletion::Deleted)
                } else {
                    Ok(AuthorDeletion::Vanished)
                }
            }
        }
    }
}
