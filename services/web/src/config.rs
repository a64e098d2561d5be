//! services/web/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Host (and optional port) this site is served as; redirect targets must
    /// resolve to this host.
    pub public_host: String,
    /// Base directory the download endpoint is confined to.
    pub docs_dir: PathBuf,
    /// Lifetime of a login session, in hours.
    pub session_ttl_hours: i64,
    /// Login attempts allowed per client address per window.
    pub login_max_attempts: u32,
    /// Length of the login rate-limit window, in seconds.
    pub login_window_secs: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://guestbook.db".to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Security Settings ---
        let public_host =
            std::env::var("PUBLIC_HOST").unwrap_or_else(|_| "localhost:8080".to_string());

        let docs_dir = std::env::var("DOCS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./docs"));

        let session_ttl_hours = parse_var("SESSION_TTL_HOURS", 24)?;
        let login_max_attempts = parse_var("LOGIN_MAX_ATTEMPTS", 5)?;
        let login_window_secs = parse_var("LOGIN_WINDOW_SECS", 60)?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            public_host,
            docs_dir,
            session_ttl_hours,
            login_max_attempts,
            login_window_secs,
        })
    }
}

/// Reads an optional numeric variable, falling back to a default when unset.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse::<T>().map_err(|_| {
            ConfigError::InvalidValue(name.to_string(), format!("'{}' is not a number", raw))
        }),
        Err(_) => Ok(default),
    }
}
