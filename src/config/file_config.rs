use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_dir: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,

    // Feature configs
    pub covers: Option<CoversConfig>,
    pub catalog: Option<CatalogConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CoversConfig {
    pub dir: Option<String>,
    pub max_size_bytes: Option<u64>,
    pub require_on_create: Option<bool>,
    pub accept_jpg_alias: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub recent_books_limit: Option<usize>,
    pub read_pool_size: Option<usize>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
            db_dir = "/var/lib/books"
            port = 8080
            logging_level = "headers"

            [covers]
            dir = "/var/lib/books/covers"
            max_size_bytes = 1048576
            require_on_create = true
            accept_jpg_alias = true

            [catalog]
            recent_books_limit = 5
            read_pool_size = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.db_dir.as_deref(), Some("/var/lib/books"));
        assert_eq!(config.port, Some(8080));
        let covers = config.covers.unwrap();
        assert_eq!(covers.max_size_bytes, Some(1048576));
        assert_eq!(covers.require_on_create, Some(true));
        assert_eq!(config.catalog.unwrap().recent_books_limit, Some(5));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert!(config.db_dir.is_none());
        assert!(config.covers.is_none());
    }

    #[test]
    fn test_load_missing_file_error() {
        let err = FileConfig::load(Path::new("/nonexistent/books.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
