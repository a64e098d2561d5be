//! services/web/src/web/pages.rs
//!
//! Static pages, the search echo, and the session-gated profile and admin
//! pages.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Extension;
use serde::Deserialize;

use crate::error::WebError;
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;
use crate::web::templates::{
    AdminPanelTemplate, DownloadsTemplate, ForumTemplate, HtmlTemplate, IndexTemplate,
    ProfileTemplate, QuotesTemplate, SearchTemplate, SitemapTemplate,
};

/// The only user id allowed into the admin panel.
const ADMIN_USER_ID: i64 = 1;

pub async fn index_handler() -> HtmlTemplate<IndexTemplate> {
    HtmlTemplate(IndexTemplate)
}

pub async fn quotes_handler() -> HtmlTemplate<QuotesTemplate> {
    HtmlTemplate(QuotesTemplate)
}

pub async fn sitemap_handler() -> HtmlTemplate<SitemapTemplate> {
    HtmlTemplate(SitemapTemplate)
}

pub async fn forum_handler() -> HtmlTemplate<ForumTemplate> {
    HtmlTemplate(ForumTemplate)
}

pub async fn downloads_page_handler() -> HtmlTemplate<DownloadsTemplate> {
    HtmlTemplate(DownloadsTemplate)
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// GET /search?query= - echo the query into the results page (escaped at
/// render).
pub async fn search_handler(Query(params): Query<SearchParams>) -> HtmlTemplate<SearchTemplate> {
    HtmlTemplate(SearchTemplate {
        query: params.query.unwrap_or_default(),
    })
}

/// GET /profile/{id} - the session's user must match the requested id.
///
/// The historical bug here was trusting the path id once any session
/// existed; the cross-check below is the fix.
pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<i64>,
) -> Result<HtmlTemplate<ProfileTemplate>, WebError> {
    if auth.0 != user_id {
        return Err(WebError::Forbidden);
    }

    let user = state.db.get_user_by_id(user_id).await?;
    let cards = state.db.get_cards_for_user(user_id).await?;
    Ok(HtmlTemplate(ProfileTemplate { user, cards }))
}

/// GET /admin_panel - gated on the admin account.
pub async fn admin_panel_handler(
    Extension(auth): Extension<AuthUser>,
) -> Result<HtmlTemplate<AdminPanelTemplate>, WebError> {
    if auth.0 != ADMIN_USER_ID {
        return Err(WebError::Forbidden);
    }
    Ok(HtmlTemplate(AdminPanelTemplate))
}
