//! crates/guestbook_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CardDetail, Comment, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn get_user_by_id(&self, user_id: i64) -> PortResult<User>;

    /// Looks up login credentials by username. The lookup must be a
    /// parameterized query; the username travels as a bind value, never as
    /// query text.
    async fn get_credentials_by_username(&self, username: &str) -> PortResult<UserCredentials>;

    /// Lists every user's stored credentials, for the password migration.
    async fn list_credentials(&self) -> PortResult<Vec<UserCredentials>>;

    /// Replaces a user's stored password with a new (hashed) value.
    async fn update_password(&self, user_id: i64, stored_password: &str) -> PortResult<()>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the user id for an unexpired session, `Unauthorized` otherwise.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<i64>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Comment Board ---
    async fn insert_comment(&self, username: &str, text: &str) -> PortResult<()>;

    /// Lists all comments in insertion order.
    async fn list_comments(&self) -> PortResult<Vec<Comment>>;

    // --- Card Details ---
    async fn get_cards_for_user(&self, user_id: i64) -> PortResult<Vec<CardDetail>>;
}
