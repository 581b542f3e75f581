use super::RequestsLoggingLevel;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Largest request body accepted by the multipart upload routes.
    pub max_upload_body_bytes: usize,
}

impl ServerConfig {
    /// Upload body limit for a given cover size limit, leaving room for the
    /// other form fields.
    pub fn upload_limit_for(max_cover_size_bytes: u64) -> usize {
        (max_cover_size_bytes as usize).saturating_add(64 * 1024)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3001,
            max_upload_body_bytes: Self::upload_limit_for(5 * 1024 * 1024),
        }
    }
}
