//! services/web/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.
//!
//! This only answers "who is the session for?". Per-resource authorization
//! (profile id match, admin id) is re-checked inside each protected handler;
//! the middleware never grants access to a specific resource by itself.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::web::state::AppState;

/// The authenticated user id, inserted into request extensions by
/// [`require_auth`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser(pub i64);

/// Pulls the session id out of the `Cookie` header, if present.
pub fn extract_session_id(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))
}

/// Middleware that validates the auth session cookie and extracts the user id.
///
/// If valid, inserts [`AuthUser`] into request extensions for handlers to use.
/// If invalid or missing, sends the browser to the login form.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let session_id = match extract_session_id(req.headers()) {
        Some(id) => id.to_owned(),
        None => return Redirect::to("/login").into_response(),
    };

    match state.db.validate_auth_session(&session_id).await {
        Ok(user_id) => {
            req.extensions_mut().insert(AuthUser(user_id));
            next.run(req).await
        }
        Err(_) => Redirect::to("/login").into_response(),
    }
}
