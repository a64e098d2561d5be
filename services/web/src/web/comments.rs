//! services/web/src/web/comments.rs
//!
//! The comment board: append-only, insertion-ordered, parameterized writes.
//! Stored text is raw; escaping happens at render time in the template.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use serde::Deserialize;

use crate::error::WebError;
use crate::web::state::AppState;
use crate::web::templates::{CommentsTemplate, HtmlTemplate};

#[derive(Deserialize)]
pub struct CommentForm {
    pub username: String,
    pub comment: String,
}

/// GET /comments - list all comments in insertion order.
pub async fn list_handler(
    State(state): State<Arc<AppState>>,
) -> Result<HtmlTemplate<CommentsTemplate>, WebError> {
    let comments = state.db.list_comments().await?;
    Ok(HtmlTemplate(CommentsTemplate { comments }))
}

/// POST /comments - append a comment, then return to the board.
pub async fn post_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CommentForm>,
) -> Result<Redirect, WebError> {
    if form.username.trim().is_empty() || form.comment.trim().is_empty() {
        return Err(WebError::InvalidInput(
            "username and comment are required".to_string(),
        ));
    }

    state.db.insert_comment(&form.username, &form.comment).await?;
    Ok(Redirect::to("/comments"))
}
