//! Server configuration

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Storage directory (orders.redb) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | CATALOG_SERVICE_URL | http://localhost:3100 | Menu catalog collaborator |
/// | CART_SERVICE_URL | http://localhost:3200 | Cart collaborator |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_LEVEL | info | Default log level (RUST_LOG overrides) |
/// | LOG_DIR | (unset) | Daily-rolling file output directory |
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage directory for the order database
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Menu catalog collaborator base URL
    pub catalog_service_url: String,
    /// Cart collaborator base URL
    pub cart_service_url: String,
    /// Runtime environment
    pub environment: String,
    /// Default log level
    pub log_level: String,
    /// Optional log file directory
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            catalog_service_url: std::env::var("CATALOG_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3100".into()),
            cart_service_url: std::env::var("CART_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:3200".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Override work dir and port, for tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }
}
