mod file_config;

pub use file_config::{CatalogConfig, CoversConfig, FileConfig};

use crate::catalog_manager::CatalogManagerConfig;
use crate::catalog_store::CoverPolicy;
use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub covers_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,

    // Feature configs (with defaults)
    pub covers: CoversSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoversSettings {
    pub dir: PathBuf,
    pub max_size_bytes: u64,
    pub require_on_create: bool,
    pub accept_jpg_alias: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    pub recent_books_limit: usize,
    pub read_pool_size: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            recent_books_limit: 10,
            read_pool_size: 4,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // TOML overrides CLI for each field
        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        // Validate db_dir exists
        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);

        let logging_level = match file.logging_level {
            Some(s) => match parse_logging_level(&s) {
                Some(level) => level,
                None => bail!("Invalid logging_level in config file: {}", s),
            },
            None => cli.logging_level.clone(),
        };

        let covers_file = file.covers.unwrap_or_default();
        let defaults = CatalogManagerConfig::default();
        let covers = CoversSettings {
            dir: covers_file
                .dir
                .map(PathBuf::from)
                .or_else(|| cli.covers_dir.clone())
                .unwrap_or_else(|| db_dir.join("covers")),
            max_size_bytes: covers_file
                .max_size_bytes
                .unwrap_or(defaults.max_cover_size_bytes),
            require_on_create: covers_file.require_on_create.unwrap_or(false),
            accept_jpg_alias: covers_file
                .accept_jpg_alias
                .unwrap_or(defaults.accept_jpg_alias),
        };
        if covers.max_size_bytes == 0 {
            bail!("covers.max_size_bytes must be greater than 0");
        }

        let catalog_file = file.catalog.unwrap_or_default();
        let catalog_defaults = CatalogSettings::default();
        let catalog = CatalogSettings {
            recent_books_limit: catalog_file
                .recent_books_limit
                .unwrap_or(catalog_defaults.recent_books_limit),
            read_pool_size: catalog_file
                .read_pool_size
                .unwrap_or(catalog_defaults.read_pool_size),
        };
        if catalog.read_pool_size == 0 {
            bail!("catalog.read_pool_size must be at least 1");
        }

        Ok(Self {
            db_dir,
            port,
            logging_level,
            covers,
            catalog,
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }

    pub fn catalog_manager_config(&self) -> CatalogManagerConfig {
        CatalogManagerConfig {
            covers_dir: self.covers.dir.clone(),
            max_cover_size_bytes: self.covers.max_size_bytes,
            cover_policy: if self.covers.require_on_create {
                CoverPolicy::Required
            } else {
                CoverPolicy::Optional
            },
            accept_jpg_alias: self.covers.accept_jpg_alias,
            recent_books_limit: self.catalog.recent_books_limit,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
