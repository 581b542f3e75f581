//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own database and covers
//! directory.

use super::constants::*;
use super::fixtures::create_test_catalog;
use book_catalog_server::catalog_manager::{CatalogManager, CatalogManagerConfig};
use book_catalog_server::catalog_store::{CatalogStore, SqliteCatalogStore};
use book_catalog_server::server::{server::make_app, RequestsLoggingLevel, ServerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with an isolated catalog
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// Catalog store for direct database access in tests
    pub store: Arc<dyn CatalogStore>,

    /// Directory uploaded covers are written to
    pub covers_dir: PathBuf,

    // Private fields - keep resources alive until drop
    _temp_catalog_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port with default settings
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawns a new test server, letting the caller adjust the catalog
    /// manager configuration first
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Catalog creation fails
    /// - Port binding fails
    /// - Server doesn't become ready within timeout
    pub async fn spawn_with(configure: impl FnOnce(&mut CatalogManagerConfig)) -> Self {
        let (temp_catalog_dir, catalog_db_path) =
            create_test_catalog().expect("Failed to create test catalog");
        let covers_dir = temp_catalog_dir.path().join("covers");

        let store = Arc::new(
            SqliteCatalogStore::new(&catalog_db_path, 2).expect("Failed to open catalog store"),
        );

        let mut manager_config = CatalogManagerConfig {
            covers_dir: covers_dir.clone(),
            max_cover_size_bytes: TEST_MAX_COVER_SIZE_BYTES,
            ..Default::default()
        };
        configure(&mut manager_config);

        let manager = CatalogManager::new(store.clone(), manager_config.clone());
        manager.init().await.expect("Failed to init catalog manager");

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            max_upload_body_bytes: ServerConfig::upload_limit_for(
                manager_config.max_cover_size_bytes,
            ),
        };
        let app = make_app(config, Arc::new(manager));

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            store,
            covers_dir,
            _temp_catalog_dir: temp_catalog_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Number of files currently in the covers directory
    pub fn cover_file_count(&self) -> usize {
        std::fs::read_dir(&self.covers_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
