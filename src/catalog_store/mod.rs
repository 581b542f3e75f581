mod filter;
mod integrity;
mod models;
mod schema;
mod store;
mod trait_def;
pub mod validation;

pub use filter::{
    fold_case, parse_search_date, AuthorFilter, BookFilter, BookOrder, BookQuery,
    BookSearchParams,
};
pub use integrity::{AuthorDeletion, AuthorDeletionCheck, AuthorDeletionGuard};
pub use models::*;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::SqliteCatalogStore;
pub use trait_def::CatalogStore;
pub use validation::{CoverPolicy, ValidationError, ValidationResult};
