//! Book Catalog Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog_manager;
pub mod catalog_store;
pub mod config;
pub mod media;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_manager::{CatalogError, CatalogManager, CatalogManagerConfig};
pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use server::{run_server, RequestsLoggingLevel};
