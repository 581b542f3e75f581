//! Book cover handling: type allowlist, inline decoding, on-disk files and
//! the ingestion pipeline that ties them to book writes.

mod allowlist;
mod cover_files;
mod inline;
mod pipeline;

pub use allowlist::CoverAllowlist;
pub use cover_files::{CoverFileError, CoverFileStore};
pub use inline::decode_inline_cover;
pub use pipeline::{
    CoverIngestError, CoverIngestion, CoverIntake, CoverPayload, CoverUpload, StagedCover,
};
