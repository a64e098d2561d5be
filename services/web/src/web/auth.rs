//! services/web/src/web/auth.rs
//!
//! Login and logout handlers.
//!
//! The login POST runs its checks in a fixed order: rate limit first (before
//! any database work), then a parameterized username lookup, then password
//! verification. A nonexistent user and a wrong password produce the same
//! inline message.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap};
use axum::Form;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::{Duration, Utc};
use guestbook_core::ports::PortError;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::credentials;
use crate::error::WebError;
use crate::web::middleware::extract_session_id;
use crate::web::state::AppState;
use crate::web::templates::{HtmlTemplate, LoginTemplate};

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /login - render the login form.
pub async fn login_page() -> HtmlTemplate<LoginTemplate> {
    HtmlTemplate(LoginTemplate { error: None })
}

/// POST /login - rate-limited credential check.
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    // Throttle before touching the database at all.
    if !state.login_limiter.try_acquire(addr.ip()) {
        return Err(WebError::RateLimited);
    }

    let creds = match state.db.get_credentials_by_username(&form.username).await {
        Ok(creds) => Some(creds),
        Err(PortError::NotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    // Unknown user and bad password take the same path.
    let creds = match creds {
        Some(c) if credentials::verify(&form.password, &c.stored_password) => c,
        _ => {
            return Ok(HtmlTemplate(LoginTemplate {
                error: Some("Invalid Credentials. Please try again.".to_string()),
            })
            .into_response())
        }
    };

    let session_id = Uuid::new_v4().to_string();
    let ttl = Duration::hours(state.config.session_ttl_hours);
    state
        .db
        .create_auth_session(&session_id, creds.id, Utc::now() + ttl)
        .await?;

    info!(user_id = creds.id, "login successful");

    let cookie = format!(
        "session={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        session_id,
        ttl.num_seconds()
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to(&format!("/profile/{}", creds.id)),
    )
        .into_response())
}

/// GET /logout - discard the session and clear the cookie.
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    if let Some(session_id) = extract_session_id(&headers) {
        state.db.delete_auth_session(session_id).await?;
    }

    let cookie = "session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0";

    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Redirect::to("/"),
    )
        .into_response())
}
