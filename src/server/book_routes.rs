//! Book HTTP routes.
//!
//! Books can be written either as JSON, with an optional inline cover
//! string, or as a multipart form carrying the cover as an uploaded file.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::error::ApiError;
use super::state::{GuardedCatalogManager, ServerState};
use crate::catalog_store::{Book, BookFields, BookSearchParams, ResolvedBook, ValidationError};
use crate::media::{CoverPayload, CoverUpload};

// =============================================================================
// Request Types
// =============================================================================

/// JSON body for book create and edit.
#[derive(Debug, Deserialize)]
pub struct BookBody {
    #[serde(flatten)]
    pub fields: BookFields,
    /// Inline cover, `{"type": <mime>, "data": <base64>}` as a string.
    #[serde(default)]
    pub cover: Option<String>,
}

impl BookBody {
    fn into_parts(self) -> (BookFields, Option<CoverPayload>) {
        (self.fields, self.cover.map(CoverPayload::Inline))
    }
}

fn parse_form_date(value: &str) -> Result<Option<NaiveDate>, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| {
            ValidationError::InvalidDate {
                field: "published_on",
                value: value.to_string(),
            }
            .into()
        })
}

fn parse_page_count(value: &str) -> Result<i64, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("page_count must be an integer, got '{}'", value)))
}

/// Read book fields and an optional cover file from a multipart form.
async fn read_book_form(
    mut multipart: Multipart,
) -> Result<(BookFields, Option<CoverPayload>), ApiError> {
    let mut fields = BookFields::default();
    let mut cover = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "cover" => {
                let declared_mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let has_file_name = field.file_name().is_some_and(|n| !n.is_empty());
                let data = field.bytes().await?;
                // A file input left empty still sends an unnamed, empty part.
                if data.is_empty() && !has_file_name {
                    continue;
                }
                cover = Some(CoverPayload::Upload(CoverUpload {
                    declared_mime,
                    data: data.to_vec(),
                }));
            }
            "title" => fields.title = field.text().await?,
            "author_id" => fields.author_id = Some(field.text().await?),
            "published_on" => fields.published_on = parse_form_date(&field.text().await?)?,
            "page_count" => fields.page_count = parse_page_count(&field.text().await?)?,
            "description" => fields.description = Some(field.text().await?),
            other => debug!("Ignoring unknown book form field '{}'", other),
        }
    }

    Ok((fields, cover))
}

// =============================================================================
// Handlers
// =============================================================================

/// GET / - Search books
async fn list_books(
    State(manager): State<GuardedCatalogManager>,
    Query(params): Query<BookSearchParams>,
) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(manager.list_books(&params)?))
}

/// POST / - Create a book from JSON
async fn create_book(
    State(manager): State<GuardedCatalogManager>,
    body: Result<Json<BookBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let (fields, cover) = body?.0.into_parts();
    let book = manager.create_book(fields, cover).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// POST /upload - Create a book from a multipart form
async fn create_book_upload(
    State(manager): State<GuardedCatalogManager>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let (fields, cover) = read_book_form(multipart).await?;
    let book = manager.create_book(fields, cover).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// GET /{id} - Get a book with its author
async fn get_book(
    State(manager): State<GuardedCatalogManager>,
    Path(id): Path<String>,
) -> Result<Json<ResolvedBook>, ApiError> {
    Ok(Json(manager.get_book(&id)?))
}

/// PUT /{id} - Edit a book from JSON
async fn update_book(
    State(manager): State<GuardedCatalogManager>,
    Path(id): Path<String>,
    body: Result<Json<BookBody>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    let (fields, cover) = body?.0.into_parts();
    Ok(Json(manager.update_book(&id, fields, cover).await?))
}

/// PUT /{id}/upload - Edit a book from a multipart form
async fn update_book_upload(
    State(manager): State<GuardedCatalogManager>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Book>, ApiError> {
    let (fields, cover) = read_book_form(multipart).await?;
    Ok(Json(manager.update_book(&id, fields, cover).await?))
}

/// DELETE /{id} - Delete a book
async fn delete_book(
    State(manager): State<GuardedCatalogManager>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    manager.delete_book(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /{id}/cover - Serve the cover image bytes
async fn get_book_cover(
    State(manager): State<GuardedCatalogManager>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cover = manager.get_book_cover(&id).await?;
    Ok(([(header::CONTENT_TYPE, cover.mime.as_mime())], cover.data))
}

// =============================================================================
// Router Construction
// =============================================================================

/// Build the book routes, nested under `/v1/books`.
///
/// The multipart routes get their own body limit, sized from the cover limit.
pub fn book_routes(max_upload_body_bytes: usize) -> Router<ServerState> {
    let upload_routes = Router::new()
        .route("/upload", post(create_book_upload))
        .route("/{id}/upload", put(update_book_upload))
        .layer(DefaultBodyLimit::max(max_upload_body_bytes));

    Router::new()
        .merge(upload_routes)
        .route("/", get(list_books).post(create_book))
        .route("/{id}", get(get_book).put(update_book).delete(delete_book))
        .route("/{id}/cover", get(get_book_cover))
}
