pub mod auth;
pub mod comments;
pub mod download;
pub mod middleware;
pub mod pages;
pub mod rate_limit;
pub mod redirect;
pub mod state;
pub mod templates;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::get,
    Router,
};

pub use middleware::require_auth;
pub use state::AppState;

/// Assembles the full application router: public routes, plus the
/// profile/admin pages behind the auth middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/", get(pages::index_handler))
        .route("/quotes", get(pages::quotes_handler))
        .route("/sitemap", get(pages::sitemap_handler))
        .route("/forum", get(pages::forum_handler))
        .route("/downloads", get(pages::downloads_page_handler))
        .route("/search", get(pages::search_handler))
        .route("/redirect", get(redirect::redirect_handler))
        .route(
            "/comments",
            get(comments::list_handler).post(comments::post_handler),
        )
        .route("/download", get(download::download_handler))
        .route(
            "/login",
            get(auth::login_page).post(auth::login_handler),
        )
        .route("/logout", get(auth::logout_handler));

    let protected_routes = Router::new()
        .route("/profile/{id}", get(pages::profile_handler))
        .route("/admin_panel", get(pages::admin_panel_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
