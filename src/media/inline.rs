//! Inline cover payloads.
//!
//! An inline cover is a JSON document `{"type": <mime>, "data": <base64>}`
//! submitted as a plain form or body field. Covers of a type outside the
//! allowlist are dropped without an error.

use super::allowlist::CoverAllowlist;
use crate::catalog_store::{CoverImage, ValidationError, ValidationResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct InlineCover {
    #[serde(rename = "type")]
    mime: String,
    data: String,
}

/// Decode an inline cover payload.
///
/// Returns `Ok(None)` for an empty payload or a cover whose type is not
/// accepted, and `InvalidCoverData` when the payload itself is malformed.
pub fn decode_inline_cover(
    raw: &str,
    allowlist: &CoverAllowlist,
) -> ValidationResult<Option<CoverImage>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let cover: InlineCover =
        serde_json::from_str(raw).map_err(|e| ValidationError::InvalidCoverData {
            reason: e.to_string(),
        })?;

    let Some(mime) = allowlist.resolve(&cover.mime) else {
        debug!("Dropping inline cover of unsupported type '{}'", cover.mime);
        return Ok(None);
    };

    let data = STANDARD
        .decode(cover.data.trim())
        .map_err(|e| ValidationError::InvalidCoverData {
            reason: format!("cover data is not valid base64: {}", e),
        })?;

    Ok(Some(CoverImage::Inline { mime, data }))
}
