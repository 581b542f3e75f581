use axum::extract::FromRef;

use crate::catalog_manager::CatalogManager;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalogManager = Arc<CatalogManager>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog_manager: GuardedCatalogManager,
}

impl ServerState {
    pub fn new(config: ServerConfig, catalog_manager: GuardedCatalogManager) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog_manager,
        }
    }
}

impl FromRef<ServerState> for GuardedCatalogManager {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog_manager.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
