//! Mapping of catalog errors onto HTTP responses.

use crate::catalog_manager::CatalogError;
use crate::catalog_store::ValidationError;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependent_books: Option<usize>,
}

impl ErrorResponse {
    fn message(error: impl Into<String>) -> Self {
        ErrorResponse {
            error: error.into(),
            field: None,
            dependent_books: None,
        }
    }
}

/// Errors a route handler can return.
#[derive(Debug)]
pub enum ApiError {
    Catalog(CatalogError),
    BadRequest(String),
    Multipart(MultipartError),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Catalog(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

fn validation_status(err: &ValidationError) -> StatusCode {
    match err {
        ValidationError::UnsupportedCoverType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ValidationError::CoverTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            CatalogError::Validation(err) => (
                validation_status(err),
                ErrorResponse {
                    error: err.to_string(),
                    field: Some(err.field()),
                    dependent_books: None,
                },
            ),
            CatalogError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, ErrorResponse::message(self.to_string()))
            }
            CatalogError::Integrity {
                dependent_books, ..
            } => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: self.to_string(),
                    field: None,
                    dependent_books: Some(*dependent_books),
                },
            ),
            CatalogError::Storage(err) => {
                error!("Catalog storage error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::message("Internal server error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Catalog(err) => err.into_response(),
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::message(message))).into_response()
            }
            ApiError::Multipart(err) => {
                warn!("Failed to read multipart body: {}", err);
                (err.status(), Json(ErrorResponse::message(err.body_text()))).into_response()
            }
        }
    }
}
