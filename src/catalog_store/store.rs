//! SQLite-backed catalog store implementation.
//!
//! One write connection serializes all mutations; reads round-robin over a
//! small pool of read-only connections. The database runs in WAL mode so
//! readers never wait on the writer.

use super::filter::{fold_case, AuthorFilter, BookFilter, BookOrder, BookQuery};
use super::models::{is_storable_date, Author, Book, CoverImage, CoverMimeType};
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::CatalogStore;
use crate::sqlite_persistence::migrate_if_needed;
use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OpenFlags};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";

const BOOK_COLUMNS: &str = "b.id, b.title, b.author_id, b.published_on, b.page_count,
    b.description, b.cover_mime, b.cover_data, b.cover_file, b.created_at";

/// SQLite-backed catalog store.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

/// Register the SQL functions the filter clauses rely on.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| fold_case(&v)))
        },
    )?;
    Ok(())
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| anyhow!("catalog database connection mutex poisoned"))
}

/// A book row before its cover columns have been checked.
struct BookRow {
    id: String,
    title: String,
    author_id: String,
    published_on: String,
    page_count: i64,
    description: Option<String>,
    cover_mime: Option<String>,
    cover_data: Option<Vec<u8>>,
    cover_file: Option<String>,
    created_at: i64,
}

impl BookRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(BookRow {
            id: row.get(0)?,
            title: row.get(1)?,
            author_id: row.get(2)?,
            published_on: row.get(3)?,
            page_count: row.get(4)?,
            description: row.get(5)?,
            cover_mime: row.get(6)?,
            cover_data: row.get(7)?,
            cover_file: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    fn into_book(self) -> Result<Book> {
        let published_on = NaiveDate::parse_from_str(&self.published_on, DATE_FORMAT)
            .with_context(|| {
                format!(
                    "Book '{}' has malformed published_on '{}'",
                    self.id, self.published_on
                )
            })?;

        let cover = match (self.cover_mime, self.cover_data, self.cover_file) {
            (None, None, None) => None,
            (Some(mime), data, file) => {
                let mime = CoverMimeType::from_mime(&mime).ok_or_else(|| {
                    anyhow!("Book '{}' has unknown cover type '{}'", self.id, mime)
                })?;
                match (data, file) {
                    (Some(data), None) => Some(CoverImage::Inline { mime, data }),
                    (None, Some(file_name)) => Some(CoverImage::Stored { mime, file_name }),
                    _ => bail!(
                        "Book '{}' must have exactly one of cover data or cover file",
                        self.id
                    ),
                }
            }
            (None, _, _) => bail!("Book '{}' has cover content without a type", self.id),
        };

        Ok(Book {
            id: self.id,
            title: self.title,
            author_id: self.author_id,
            published_on,
            page_count: self.page_count,
            description: self.description,
            cover,
            created_at: self.created_at,
        })
    }
}

/// Split a cover into its (mime, data, file) columns.
fn cover_columns(cover: &Option<CoverImage>) -> (Option<&'static str>, Option<&[u8]>, Option<&str>) {
    match cover {
        None => (None, None, None),
        Some(CoverImage::Inline { mime, data }) => (Some(mime.as_mime()), Some(data), None),
        Some(CoverImage::Stored { mime, file_name }) => {
            (Some(mime.as_mime()), None, Some(file_name))
        }
    }
}

/// `published_on` as stored. Dates outside years 0..=9999 would break the
/// text ordering the date filters rely on, so they are refused.
fn date_to_sql(date: &NaiveDate) -> Result<String> {
    if !is_storable_date(*date) {
        bail!("Date {} is outside the storable range", date);
    }
    Ok(date.format(DATE_FORMAT).to_string())
}

/// Build the SELECT statement and its positional values for a book query.
fn book_query_sql(query: &BookQuery) -> Result<(String, Vec<Value>)> {
    let BookFilter {
        title_contains,
        author_name_contains,
        published_on_or_after,
        published_on_or_before,
    } = &query.filter;

    let mut sql = format!("SELECT {} FROM books b", BOOK_COLUMNS);
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(needle) = author_name_contains {
        sql.push_str(" INNER JOIN authors a ON a.id = b.author_id");
        values.push(Value::Text(needle.clone()));
        clauses.push(format!("instr(fold_case(a.name), ?{}) > 0", values.len()));
    }
    if let Some(needle) = title_contains {
        values.push(Value::Text(needle.clone()));
        clauses.push(format!("instr(fold_case(b.title), ?{}) > 0", values.len()));
    }
    if let Some(date) = published_on_or_after {
        values.push(Value::Text(date_to_sql(date)?));
        clauses.push(format!("b.published_on >= ?{}", values.len()));
    }
    if let Some(date) = published_on_or_before {
        values.push(Value::Text(date_to_sql(date)?));
        clauses.push(format!("b.published_on <= ?{}", values.len()));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    sql.push_str(match query.order {
        BookOrder::Store => " ORDER BY b.rowid",
        BookOrder::RecentlyCreated => " ORDER BY b.created_at DESC, b.rowid DESC",
    });

    if let Some(limit) = query.limit {
        values.push(Value::Integer(limit as i64));
        sql.push_str(&format!(" LIMIT ?{}", values.len()));
    }

    Ok((sql, values))
}

impl SqliteCatalogStore {
    /// Open (or create) the catalog database.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of read-only connections (at least 1)
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("Failed to open catalog database at {:?}", db_path))?;

        migrate_if_needed(&mut write_conn, CATALOG_VERSIONED_SCHEMAS)?;

        let journal_mode: String =
            write_conn.pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))?;
        debug!("Catalog journal mode: {}", journal_mode);
        write_conn.busy_timeout(Duration::from_secs(5))?;
        register_functions(&write_conn)?;

        let mut read_pool = Vec::with_capacity(read_pool_size.max(1));
        for _ in 0..read_pool_size.max(1) {
            let read_conn = Connection::open_with_flags(
                db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_conn.busy_timeout(Duration::from_secs(5))?;
            register_functions(&read_conn)?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        let store = SqliteCatalogStore {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        };

        info!(
            "Opened book catalog: {} authors, {} books",
            store.get_authors_count()?,
            store.get_books_count()?
        );

        Ok(store)
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    fn count(&self, sql: &str, params: impl rusqlite::Params) -> Result<usize> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let count: i64 = conn.query_row(sql, params, |r| r.get(0))?;
        Ok(count as usize)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn list_authors(&self, filter: &AuthorFilter) -> Result<Vec<Author>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;

        let parse = |row: &rusqlite::Row| {
            Ok(Author {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        };

        let authors = match &filter.name_contains {
            Some(needle) => {
                let mut stmt = conn.prepare_cached(
                    "SELECT id, name FROM authors
                     WHERE instr(fold_case(name), ?1) > 0
                     ORDER BY rowid",
                )?;
                let rows = stmt.query_map(params![needle], parse)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = conn.prepare_cached("SELECT id, name FROM authors ORDER BY rowid")?;
                let rows = stmt.query_map([], parse)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(authors)
    }

    fn get_author(&self, id: &str) -> Result<Option<Author>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;

        match conn.query_row(
            "SELECT id, name FROM authors WHERE id = ?1",
            params![id],
            |row| {
                Ok(Author {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        ) {
            Ok(author) => Ok(Some(author)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn author_exists(&self, id: &str) -> Result<bool> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM authors WHERE id = ?1)",
            params![id],
            |r| r.get(0),
        )?;
        Ok(exists)
    }

    fn insert_author(&self, author: &Author) -> Result<()> {
        let conn = lock(&self.write_conn)?;
        conn.execute(
            "INSERT INTO authors (id, name) VALUES (?1, ?2)",
            params![&author.id, &author.name],
        )
        .with_context(|| format!("Failed to insert author '{}'", author.id))?;
        Ok(())
    }

    fn update_author(&self, author: &Author) -> Result<bool> {
        let conn = lock(&self.write_conn)?;
        let changed = conn.execute(
            "UPDATE authors SET name = ?1 WHERE id = ?2",
            params![&author.name, &author.id],
        )?;
        Ok(changed > 0)
    }

    fn delete_author(&self, id: &str) -> Result<bool> {
        let conn = lock(&self.write_conn)?;
        let changed = conn.execute("DELETE FROM authors WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn count_books_by_author(&self, author_id: &str) -> Result<usize> {
        self.count(
            "SELECT COUNT(*) FROM books WHERE author_id = ?1",
            params![author_id],
        )
    }

    fn find_books(&self, query: &BookQuery) -> Result<Vec<Book>> {
        let (sql, values) = book_query_sql(query)?;
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;

        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), BookRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(BookRow::into_book).collect()
    }

    fn get_book(&self, id: &str) -> Result<Option<Book>> {
        let read_conn = self.get_read_conn();
        let conn = lock(&read_conn)?;

        let mut stmt =
            conn.prepare_cached(&format!("SELECT {} FROM books b WHERE b.id = ?1", BOOK_COLUMNS))?;
        match stmt.query_row(params![id], BookRow::from_row) {
            Ok(row) => Ok(Some(row.into_book()?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn insert_book(&self, book: &Book) -> Result<i64> {
        let published_on = date_to_sql(&book.published_on)?;
        let (cover_mime, cover_data, cover_file) = cover_columns(&book.cover);
        let conn = lock(&self.write_conn)?;
        conn.execute(
            "INSERT INTO books (id, title, author_id, published_on, page_count, description,
                                cover_mime, cover_data, cover_file)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                &book.id,
                &book.title,
                &book.author_id,
                published_on,
                book.page_count,
                &book.description,
                cover_mime,
                cover_data,
                cover_file,
            ],
        )
        .with_context(|| format!("Failed to insert book '{}'", book.id))?;

        let created_at: i64 = conn.query_row(
            "SELECT created_at FROM books WHERE rowid = ?1",
            params![conn.last_insert_rowid()],
            |r| r.get(0),
        )?;
        Ok(created_at)
    }

    fn update_book(&self, book: &Book) -> Result<bool> {
        let published_on = date_to_sql(&book.published_on)?;
        let (cover_mime, cover_data, cover_file) = cover_columns(&book.cover);
        let conn = lock(&self.write_conn)?;
        let changed = conn
            .execute(
                "UPDATE books SET title = ?1, author_id = ?2, published_on = ?3, page_count = ?4,
                    description = ?5, cover_mime = ?6, cover_data = ?7, cover_file = ?8
                 WHERE id = ?9",
                params![
                    &book.title,
                    &book.author_id,
                    published_on,
                    book.page_count,
                    &book.description,
                    cover_mime,
                    cover_data,
                    cover_file,
                    &book.id,
                ],
            )
            .with_context(|| format!("Failed to update book '{}'", book.id))?;
        Ok(changed > 0)
    }

    fn delete_book(&self, id: &str) -> Result<bool> {
        let conn = lock(&self.write_conn)?;
        let changed = conn.execute("DELETE FROM books WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn get_authors_count(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM authors", [])
    }

    fn get_books_count(&self) -> Result<usize> {
        self.count("SELECT COUNT(*) FROM books", [])
    }
}
