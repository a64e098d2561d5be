//! services/web/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;
use std::time::Duration;

use guestbook_core::ports::DatabaseService;

use crate::config::Config;
use crate::web::rate_limit::RateLimiter;

/// The shared application state, created once at startup and passed to all handlers.
///
/// This replaces the framework-global app/session singletons of the original
/// design: everything a handler touches arrives through this request-scoped
/// reference.
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    /// Counts login attempts per client address; checked before any
    /// credential work.
    pub login_limiter: RateLimiter,
}

impl AppState {
    pub fn new(db: Arc<dyn DatabaseService>, config: Arc<Config>) -> Arc<Self> {
        let login_limiter = RateLimiter::new(
            config.login_max_attempts,
            Duration::from_secs(config.login_window_secs),
        );
        Arc::new(Self {
            db,
            config,
            login_limiter,
        })
    }
}
