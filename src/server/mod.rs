mod author_routes;
mod book_routes;
pub mod config;
mod error;
mod http_layers;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorResponse};
pub use http_layers::*;
pub use server::run_server;
