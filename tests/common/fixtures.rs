//! Test fixture creation for the catalog database
//!
//! Seeds a temporary catalog with three authors and two books through the
//! store itself, so fixtures always match the current schema.

use super::constants::*;
use anyhow::Result;
use book_catalog_server::catalog_store::{Author, Book, CatalogStore, SqliteCatalogStore};
use chrono::NaiveDate;
use std::path::PathBuf;
use tempfile::TempDir;

fn author(id: &str, name: &str) -> Author {
    Author {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn book(id: &str, title: &str, author_id: &str, published_on: &str, page_count: i64) -> Result<Book> {
    Ok(Book {
        id: id.to_string(),
        title: title.to_string(),
        author_id: author_id.to_string(),
        published_on: NaiveDate::parse_from_str(published_on, "%Y-%m-%d")?,
        page_count,
        description: None,
        cover: None,
        created_at: 0,
    })
}

/// Creates a temporary catalog with 3 authors and 2 books.
/// Returns (temp_dir, catalog_db_path)
pub fn create_test_catalog() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let catalog_db_path = dir.path().join("catalog.db");

    let store = SqliteCatalogStore::new(&catalog_db_path, 1)?;

    store.insert_author(&author(AUTHOR_1_ID, AUTHOR_1_NAME))?;
    store.insert_author(&author(AUTHOR_2_ID, AUTHOR_2_NAME))?;
    store.insert_author(&author(AUTHOR_3_ID, AUTHOR_3_NAME))?;

    store.insert_book(&book(
        BOOK_1_ID,
        BOOK_1_TITLE,
        AUTHOR_1_ID,
        BOOK_1_PUBLISHED_ON,
        412,
    )?)?;
    store.insert_book(&book(
        BOOK_2_ID,
        BOOK_2_TITLE,
        AUTHOR_2_ID,
        BOOK_2_PUBLISHED_ON,
        255,
    )?)?;

    Ok((dir, catalog_db_path))
}
