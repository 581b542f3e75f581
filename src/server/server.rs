use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use axum::{extract::State, middleware, routing::get, Json, Router};
use serde::Serialize;

use super::author_routes::author_routes;
use super::book_routes::book_routes;
use super::error::ApiError;
use super::{log_requests, state::*, ServerConfig};
use crate::catalog_manager::CatalogManager;
use crate::catalog_store::Book;

#[derive(Serialize)]
struct HomeResponse {
    pub uptime: String,
    pub version: &'static str,
    pub recent_books: Vec<Book>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// GET / - Server status and the most recently added books
async fn home(State(state): State<ServerState>) -> Result<Json<HomeResponse>, ApiError> {
    Ok(Json(HomeResponse {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
        recent_books: state.catalog_manager.recent_books()?,
    }))
}

pub fn make_app(config: ServerConfig, catalog_manager: Arc<CatalogManager>) -> Router {
    let max_upload_body_bytes = config.max_upload_body_bytes;
    let state = ServerState::new(config, catalog_manager);

    Router::new()
        .route("/", get(home))
        .nest("/v1/authors", author_routes())
        .nest("/v1/books", book_routes(max_upload_body_bytes))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server");
}

pub async fn run_server(config: ServerConfig, catalog_manager: Arc<CatalogManager>) -> Result<()> {
    let port = config.port;
    let app = make_app(config, catalog_manager);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
