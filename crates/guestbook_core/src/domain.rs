//! crates/guestbook_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
}

// Only used internally for login and the password migration - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: i64,
    pub username: String,
    pub stored_password: String,
}

/// A single guestbook entry. Append-only; entries are never edited or deleted.
#[derive(Debug, Clone)]
pub struct Comment {
    pub username: String,
    pub text: String,
}

/// A payment card record attached to a user's profile. Read-only from the
/// application's perspective; rows come from the bootstrap script.
#[derive(Debug, Clone)]
pub struct CardDetail {
    pub user_id: i64,
    pub card_number: String,
    pub expiration: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}
