mod error;
mod manager;

pub use error::{CatalogError, CatalogResult};
pub use manager::{CatalogManager, CatalogManagerConfig};
