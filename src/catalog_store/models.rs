//! Catalog entity models.
//!
//! These are the in-memory shapes of rows in the `authors` and `books`
//! tables, plus the input structures accepted by write operations.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Enumerations
// =============================================================================

/// Image formats a cover may be stored in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum CoverMimeType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/gif")]
    Gif,
}

impl CoverMimeType {
    /// Parse a canonical MIME label. Aliases are handled by the allowlist.
    pub fn from_mime(s: &str) -> Option<Self> {
        match s {
            "image/jpeg" => Some(CoverMimeType::Jpeg),
            "image/png" => Some(CoverMimeType::Png),
            "image/gif" => Some(CoverMimeType::Gif),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            CoverMimeType::Jpeg => "image/jpeg",
            CoverMimeType::Png => "image/png",
            CoverMimeType::Gif => "image/gif",
        }
    }

    /// File extension used for stored cover files.
    pub fn extension(&self) -> &'static str {
        match self {
            CoverMimeType::Jpeg => "jpg",
            CoverMimeType::Png => "png",
            CoverMimeType::Gif => "gif",
        }
    }
}

impl std::fmt::Display for CoverMimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_mime())
    }
}

/// A book cover, either embedded in the row or stored as a file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CoverImage {
    Inline {
        mime: CoverMimeType,
        #[serde(skip)]
        data: Vec<u8>,
    },
    Stored {
        mime: CoverMimeType,
        file_name: String,
    },
}

impl CoverImage {
    pub fn mime(&self) -> CoverMimeType {
        match self {
            CoverImage::Inline { mime, .. } | CoverImage::Stored { mime, .. } => *mime,
        }
    }

    /// The file token, for covers kept in the covers directory.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            CoverImage::Inline { .. } => None,
            CoverImage::Stored { file_name, .. } => Some(file_name),
        }
    }
}

// =============================================================================
// Core Entities
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Author {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author_id: String,
    pub published_on: NaiveDate,
    pub page_count: i64,
    pub description: Option<String>,
    pub cover: Option<CoverImage>,
    /// Unix seconds, assigned by the store on insert.
    pub created_at: i64,
}

/// A book together with its author.
///
/// `author` is `None` only when the book references an author that no
/// longer exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedBook {
    pub book: Book,
    pub author: Option<Author>,
}

/// Cover bytes ready to be served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoverBytes {
    pub mime: CoverMimeType,
    pub data: Vec<u8>,
}

// =============================================================================
// Write Inputs
// =============================================================================

/// Editable book fields, as submitted by a create or full-field edit.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BookFields {
    #[serde(default)]
    pub title: String,
    pub author_id: Option<String>,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub published_on: Option<NaiveDate>,
    #[serde(default)]
    pub page_count: i64,
    pub description: Option<String>,
}

impl BookFields {
    /// Description with blank text collapsed to `None`.
    pub fn normalized_description(&self) -> Option<String> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    }
}

/// Publish dates are stored as `YYYY-MM-DD` text, which only sorts like the
/// dates themselves for four-digit years.
pub fn is_storable_date(date: NaiveDate) -> bool {
    (0..=9999).contains(&date.year())
}

fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}
