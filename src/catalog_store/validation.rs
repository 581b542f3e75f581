//! Validation for catalog entities.
//!
//! Pure functions that check user-supplied fields before anything is
//! written. None of them touch the store, so the author existence check
//! and cover intake happen in the manager after these pass.

use super::models::{is_storable_date, BookFields};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref NUMERIC_NAME: Regex = Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").unwrap();
}

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyName,
    NameIsNumeric { name: String },
    EmptyTitle,
    MissingAuthor { author_id: Option<String> },
    MissingPublishDate,
    PageCountBelowOne { value: i64 },
    MissingCover,
    UnsupportedCoverType { mime: String },
    CoverTooLarge { size: u64, max: u64 },
    InvalidCoverData { reason: String },
    InvalidDate { field: &'static str, value: String },
}

impl ValidationError {
    /// The input field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyName | ValidationError::NameIsNumeric { .. } => "name",
            ValidationError::EmptyTitle => "title",
            ValidationError::MissingAuthor { .. } => "author_id",
            ValidationError::MissingPublishDate => "published_on",
            ValidationError::PageCountBelowOne { .. } => "page_count",
            ValidationError::MissingCover
            | ValidationError::UnsupportedCoverType { .. }
            | ValidationError::CoverTooLarge { .. }
            | ValidationError::InvalidCoverData { .. } => "cover",
            ValidationError::InvalidDate { field, .. } => *field,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyName => write!(f, "Author name can not be empty"),
            ValidationError::NameIsNumeric { name } => {
                write!(f, "Author name can not be a number, got '{}'", name)
            }
            ValidationError::EmptyTitle => write!(f, "Book title can not be empty"),
            ValidationError::MissingAuthor { author_id: None } => {
                write!(f, "Book author is required")
            }
            ValidationError::MissingAuthor {
                author_id: Some(id),
            } => write!(f, "Author '{}' was not found", id),
            ValidationError::MissingPublishDate => {
                write!(f, "Publish date for the book is required")
            }
            ValidationError::PageCountBelowOne { value } => {
                write!(f, "Book page count must be at least 1, got {}", value)
            }
            ValidationError::MissingCover => write!(f, "Book cover is required"),
            ValidationError::UnsupportedCoverType { mime } => {
                write!(f, "Unsupported cover image type '{}'", mime)
            }
            ValidationError::CoverTooLarge { size, max } => {
                write!(f, "Cover image too large: {} bytes (max: {})", size, max)
            }
            ValidationError::InvalidCoverData { reason } => {
                write!(f, "Invalid cover data: {}", reason)
            }
            ValidationError::InvalidDate { field, value } => {
                write!(f, "Field '{}' is not a valid date: '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Whether a new book must come with a cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoverPolicy {
    #[default]
    Optional,
    Required,
}

/// Validate an author name, returning it trimmed.
pub fn validate_author_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if NUMERIC_NAME.is_match(name) {
        return Err(ValidationError::NameIsNumeric {
            name: name.to_string(),
        });
    }
    Ok(name.to_string())
}

/// Validate the editable fields of a book.
///
/// Checks run in a fixed order (title, author, publish date, page count)
/// and the first failure is returned.
pub fn validate_book_fields(fields: &BookFields) -> ValidationResult<()> {
    if fields.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    match fields.author_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => {}
        _ => return Err(ValidationError::MissingAuthor { author_id: None }),
    }
    match fields.published_on {
        None => return Err(ValidationError::MissingPublishDate),
        Some(date) if !is_storable_date(date) => {
            return Err(ValidationError::InvalidDate {
                field: "published_on",
                value: date.to_string(),
            })
        }
        Some(_) => {}
    }
    if fields.page_count < 1 {
        return Err(ValidationError::PageCountBelowOne {
            value: fields.page_count,
        });
    }
    Ok(())
}

/// Check cover presence against the creation policy.
pub fn validate_cover_presence(has_cover: bool, policy: CoverPolicy) -> ValidationResult<()> {
    if policy == CoverPolicy::Required && !has_cover {
        return Err(ValidationError::MissingCover);
    }
    Ok(())
}
