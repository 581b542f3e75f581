//! Accepted cover image types.

use crate::catalog_store::CoverMimeType;

/// Maps declared MIME labels onto the cover types the catalog stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverAllowlist {
    /// Accept the non-standard `image/jpg` label as JPEG.
    pub accept_jpg_alias: bool,
}

impl CoverAllowlist {
    pub fn new(accept_jpg_alias: bool) -> Self {
        Self { accept_jpg_alias }
    }

    /// Resolve a declared MIME label, ignoring case, surrounding whitespace
    /// and any `;` parameters. Returns `None` for labels outside the list.
    pub fn resolve(&self, declared: &str) -> Option<CoverMimeType> {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "image/jpg" if self.accept_jpg_alias => Some(CoverMimeType::Jpeg),
            other => CoverMimeType::from_mime(other),
        }
    }
}
