//! services/web/src/error.rs
//!
//! Defines the primary error types for the entire web service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use guestbook_core::ports::PortError;

use crate::config::ConfigError;

/// The primary error type for service startup and shutdown.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Per-request failures, mapped onto HTTP status codes.
///
/// Invalid login credentials are deliberately absent: they are rendered
/// inline in the login form, not surfaced as an HTTP error.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Not found")]
    NotFound,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid destination")]
    InvalidDestination,

    #[error("Malformed request: {0}")]
    InvalidInput(String),

    #[error("Too many login attempts; try again shortly")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebError::NotFound => StatusCode::NOT_FOUND,
            WebError::Forbidden => StatusCode::FORBIDDEN,
            WebError::InvalidDestination | WebError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            WebError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {self}");
        }

        (status, self.to_string()).into_response()
    }
}

impl From<PortError> for WebError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(_) => WebError::NotFound,
            PortError::Unauthorized => WebError::Forbidden,
            PortError::Unexpected(msg) => WebError::Internal(msg),
        }
    }
}
