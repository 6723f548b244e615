//! Server settings read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Process settings, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// PostgreSQL connection string (`DATABASE_URL`, required).
    pub database_url: String,
    /// Bind host (`HOST`, default `0.0.0.0`).
    pub host: String,
    /// Bind port (`PORT`, default `3000`).
    pub port: u16,
    /// Site configuration file (`FOLIO_CONFIG`).
    pub config_path: PathBuf,
    /// Content types file (`FOLIO_CONTENT_TYPES`).
    pub content_types_path: PathBuf,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `DATABASE_URL` is missing or `PORT`
    /// is not a valid port number.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            AppError::Config("DATABASE_URL environment variable must be set".into())
        })?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
        let config_path = lookup("FOLIO_CONFIG")
            .map_or_else(|| PathBuf::from("config/config.yaml"), PathBuf::from);
        let content_types_path = lookup("FOLIO_CONTENT_TYPES")
            .map_or_else(|| PathBuf::from("config/contenttypes.yaml"), PathBuf::from);

        Ok(Self {
            database_url,
            host,
            port,
            config_path,
            content_types_path,
        })
    }

    /// Returns the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `host:port` is not a socket address.
    pub fn addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
