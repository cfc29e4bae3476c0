//! API service configuration loaded from the environment

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;
use std::time::Duration;

/// Where users and media are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Where revoked sessions are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreBackend {
    Redis,
    Memory,
}

/// API service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Socket address to listen on
    pub bind_address: String,
    /// Comma-separated front-end origins allowed to send credentials
    pub cors_allowed_origins: String,
    /// Name of the session cookie
    pub session_cookie_name: String,
    /// Whether the session cookie carries the `Secure` attribute
    pub session_cookie_secure: bool,
    /// TMDB API key
    pub tmdb_api_key: String,
    /// TMDB API base URL
    pub tmdb_base_url: String,
    /// Upper bound for a single TMDB request
    pub tmdb_timeout_secs: u64,
    /// Return internal error detail in 500 responses (development only)
    pub verbose_errors: bool,
    pub storage_backend: StorageBackend,
    pub session_store: SessionStoreBackend,
}

impl ApiConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDRESS` (default: "0.0.0.0:5000")
    /// - `CORS_ALLOWED_ORIGINS` (default: local Vite dev server origins)
    /// - `SESSION_COOKIE_NAME` (default: "session")
    /// - `SESSION_COOKIE_SECURE` (default: true)
    /// - `TMDB_API_KEY` (default: empty)
    /// - `TMDB_BASE_URL` (default: "https://api.themoviedb.org/3")
    /// - `TMDB_TIMEOUT_SECS` (default: 10)
    /// - `VERBOSE_ERRORS` (default: false)
    /// - `STORAGE_BACKEND`: "postgres" or "memory" (default: "postgres")
    /// - `SESSION_STORE`: "redis" or "memory" (default: "redis")
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            .set_default("bind_address", "0.0.0.0:5000")?
            .set_default(
                "cors_allowed_origins",
                "http://localhost:5173,http://127.0.0.1:5173",
            )?
            .set_default("session_cookie_name", "session")?
            .set_default("session_cookie_secure", true)?
            .set_default("tmdb_api_key", "")?
            .set_default("tmdb_base_url", "https://api.themoviedb.org/3")?
            .set_default("tmdb_timeout_secs", 10_i64)?
            .set_default("verbose_errors", false)?
            .set_default("storage_backend", "postgres")?
            .set_default("session_store", "redis")?
            .add_source(Environment::default().try_parsing(true))
            .build()?;

        config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Parsed CORS origin list
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn tmdb_timeout(&self) -> Duration {
        Duration::from_secs(self.tmdb_timeout_secs)
    }
}
