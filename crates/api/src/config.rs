use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Whether the auth cookie carries the `Secure` attribute (default: `false`).
    pub secure_cookies: bool,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Google Drive integration settings.
    pub drive: DriveConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SECURE_COOKIES`       | `false`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let secure_cookies: bool = std::env::var("SECURE_COOKIES")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("SECURE_COOKIES must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            secure_cookies,
            jwt: JwtConfig::from_env(),
            drive: DriveConfig::from_env(),
        }
    }
}

/// Google Drive service-account settings.
#[derive(Debug, Clone, Default)]
pub struct DriveConfig {
    /// Path to the service-account JSON key. `None` leaves the integration
    /// unconfigured.
    pub key_file: Option<PathBuf>,
}

impl DriveConfig {
    /// | Env Var                           | Required | Default |
    /// |-----------------------------------|----------|---------|
    /// | `GOOGLE_SERVICE_ACCOUNT_KEY_FILE` | no       | --      |
    pub fn from_env() -> Self {
        let key_file = std::env::var("GOOGLE_SERVICE_ACCOUNT_KEY_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        Self { key_file }
    }
}
