//! services/web/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the SQLite database using `sqlx`.
//!
//! Every statement here is parameterized; user input only ever reaches the
//! database as a bind value.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guestbook_core::domain::{CardDetail, Comment, User, UserCredentials};
use guestbook_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, SqlitePool};

/// The schema-and-seed script applied to a fresh database file.
const BOOTSTRAP_SQL: &str = include_str!("../../bootstrap.sql");

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct SqliteAdapter {
    pool: SqlitePool,
}

impl SqliteAdapter {
    /// Creates a new `SqliteAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Applies the bootstrap script when the `users` table is absent.
    ///
    /// Mirrors the original deployment behavior: a missing database file is
    /// initialized from a fixed script; an existing one is left untouched.
    pub async fn bootstrap_if_needed(&self) -> Result<bool, sqlx::Error> {
        let existing: Option<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users'",
        )
        .fetch_optional(&self.pool)
        .await?;

        if existing.is_some() {
            return Ok(false);
        }

        sqlx::raw_sql(BOOTSTRAP_SQL).execute(&self.pool).await?;
        Ok(true)
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: i64,
    username: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: i64,
    username: String,
    password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            id: self.id,
            username: self.username,
            stored_password: self.password,
        }
    }
}

#[derive(FromRow)]
struct CommentRecord {
    username: String,
    text: String,
}
impl CommentRecord {
    fn to_domain(self) -> Comment {
        Comment {
            username: self.username,
            text: self.text,
        }
    }
}

#[derive(FromRow)]
struct CardRecord {
    id: i64,
    card_number: String,
    expiration: String,
}
impl CardRecord {
    fn to_domain(self) -> CardDetail {
        CardDetail {
            user_id: self.id,
            card_number: self.card_number,
            expiration: self.expiration,
        }
    }
}

#[derive(FromRow)]
struct AuthSessionRecord {
    user_id: i64,
    expires_at: DateTime<Utc>,
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for SqliteAdapter {
    async fn get_user_by_id(&self, user_id: i64) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", user_id)),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn get_credentials_by_username(&self, username: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, username, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("User '{}' not found", username))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn list_credentials(&self) -> PortResult<Vec<UserCredentials>> {
        let records = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, username, password FROM users ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_password(&self, user_id: i64, stored_password: &str) -> PortResult<()> {
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(stored_password)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<i64> {
        let record = sqlx::query_as::<_, AuthSessionRecord>(
            "SELECT user_id, expires_at FROM auth_sessions WHERE id = ?",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        match record {
            Some(session) if session.expires_at > Utc::now() => Ok(session.user_id),
            Some(_) => {
                // Expired rows are reaped lazily on first use.
                self.delete_auth_session(session_id).await?;
                Err(PortError::Unauthorized)
            }
            None => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn insert_comment(&self, username: &str, text: &str) -> PortResult<()> {
        sqlx::query("INSERT INTO comments (username, text) VALUES (?, ?)")
            .bind(username)
            .bind(text)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn list_comments(&self) -> PortResult<Vec<Comment>> {
        let records = sqlx::query_as::<_, CommentRecord>(
            "SELECT username, text FROM comments ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_cards_for_user(&self, user_id: i64) -> PortResult<Vec<CardDetail>> {
        let records = sqlx::query_as::<_, CardRecord>(
            "SELECT id, card_number, expiration FROM carddetail WHERE id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
