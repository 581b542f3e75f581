//! Author HTTP routes.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::error::ApiError;
use super::state::{GuardedCatalogManager, ServerState};
use crate::catalog_store::Author;

#[derive(Debug, Deserialize)]
pub struct AuthorListQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorBody {
    #[serde(default)]
    pub name: String,
}

/// GET / - List authors, optionally filtered by name
async fn list_authors(
    State(manager): State<GuardedCatalogManager>,
    Query(query): Query<AuthorListQuery>,
) -> Result<Json<Vec<Author>>, ApiError> {
    Ok(Json(manager.list_authors(query.name.as_deref())?))
}

/// POST / - Create an author
async fn create_author(
    State(manager): State<GuardedCatalogManager>,
    body: Result<Json<AuthorBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Author>), ApiError> {
    let Json(body) = body?;
    let author = manager.create_author(&body.name)?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// GET /{id} - Get an author
async fn get_author(
    State(manager): State<GuardedCatalogManager>,
    Path(id): Path<String>,
) -> Result<Json<Author>, ApiError> {
    Ok(Json(manager.get_author(&id)?))
}

/// PUT /{id} - Rename an author
async fn update_author(
    State(manager): State<GuardedCatalogManager>,
    Path(id): Path<String>,
    body: Result<Json<AuthorBody>, JsonRejection>,
) -> Result<Json<Author>, ApiError> {
    let Json(body) = body?;
    Ok(Json(manager.update_author(&id, &body.name)?))
}

/// DELETE /{id} - Delete an author that has no books
async fn delete_author(
    State(manager): State<GuardedCatalogManager>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    manager.delete_author(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build the author routes, nested under `/v1/authors`.
pub fn author_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list_authors).post(create_author))
        .route(
            "/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
}
