//! services/web/src/web/templates.rs
//!
//! Askama templates for every HTML page, plus the axum responder wrapper.
//! Askama escapes every interpolation at render time; that is the single
//! XSS policy for the whole site (comments, search echo, profile fields).

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use guestbook_core::domain::{CardDetail, Comment, User};

/// Renders an askama template as an HTML response.
pub struct HtmlTemplate<T>(pub T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                tracing::error!("Template rendering failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate;

#[derive(Template)]
#[template(path = "quotes.html")]
pub struct QuotesTemplate;

#[derive(Template)]
#[template(path = "sitemap.html")]
pub struct SitemapTemplate;

#[derive(Template)]
#[template(path = "forum.html")]
pub struct ForumTemplate;

#[derive(Template)]
#[template(path = "downloads.html")]
pub struct DownloadsTemplate;

#[derive(Template)]
#[template(path = "admin_panel.html")]
pub struct AdminPanelTemplate;

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub query: String,
}

#[derive(Template)]
#[template(path = "comments.html")]
pub struct CommentsTemplate {
    pub comments: Vec<Comment>,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub user: User,
    pub cards: Vec<CardDetail>,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}
