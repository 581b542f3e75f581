//! SQLite schema definitions for the book catalog database.
//!
//! Primary keys are integer rowids; entities are looked up by their unique
//! text ids. A book's cover is stored either inline (`cover_data`) or as a
//! file token (`cover_file`) naming a file in the covers directory, and
//! `cover_mime` is set whenever either one is.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

const DEFAULT_TIMESTAMP: &str = "(cast(strftime('%s','now') as int))";

/// Authors table
const AUTHORS_TABLE: Table = Table {
    name: "authors",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_authors_id", "id")],
    unique_columns: &["id"],
};

/// Books table. `author_id` is not a SQL foreign key; the author/book
/// relationship is enforced by the deletion guard.
const BOOKS_TABLE: Table = Table {
    name: "books",
    columns: &[
        sqlite_column!("rowid", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("id", &SqlType::Text, non_null = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("author_id", &SqlType::Text, non_null = true),
        sqlite_column!("published_on", &SqlType::Text, non_null = true), // 'YYYY-MM-DD'
        sqlite_column!("page_count", &SqlType::Integer, non_null = true),
        sqlite_column!("description", &SqlType::Text),
        sqlite_column!("cover_mime", &SqlType::Text),
        sqlite_column!("cover_data", &SqlType::Blob),
        sqlite_column!("cover_file", &SqlType::Text),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[
        ("idx_books_id", "id"),
        ("idx_books_author", "author_id"),
        ("idx_books_published_on", "published_on"),
        ("idx_books_created_at", "created_at"),
    ],
    unique_columns: &["id"],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[AUTHORS_TABLE, BOOKS_TABLE],
    migration: None,
}];

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::{params, Connection};

    #[test]
    fn test_schema_creates_successfully() {
        let conn = Connection::open_in_memory().unwrap();
        let schema = &CATALOG_VERSIONED_SCHEMAS[0];
        schema.create(&conn).unwrap();
        schema.validate(&conn).unwrap();
    }

    #[test]
    fn test_created_at_defaults_to_now() {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();

        conn.execute(
            "INSERT INTO books (id, title, author_id, published_on, page_count)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params!["b1", "Dune", "a1", "1965-08-01", 412],
        )
        .unwrap();

        let created_at: i64 = conn
            .query_row("SELECT created_at FROM books WHERE id = 'b1'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert!(created_at > 1_600_000_000);
    }

    #[test]
    fn test_duplicate_author_id_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        CATALOG_VERSIONED_SCHEMAS[0].create(&conn).unwrap();

        conn.execute(
            "INSERT INTO authors (id, name) VALUES ('a1', 'Frank Herbert')",
            [],
        )
        .unwrap();
        let result = conn.execute(
            "INSERT INTO authors (id, name) VALUES ('a1', 'Someone Else')",
            [],
        );
        assert!(result.is_err());
    }
}
