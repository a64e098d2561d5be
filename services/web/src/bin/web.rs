//! services/web/src/bin/web.rs

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web_lib::{
    adapters::SqliteAdapter,
    config::Config,
    credentials,
    error::ApiError,
    web::{router, AppState},
};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Database & Bootstrap If Absent ---
    info!("Opening database at {}", config.database_url);
    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let db_pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;
    let db_adapter = Arc::new(SqliteAdapter::new(db_pool.clone()));
    if db_adapter.bootstrap_if_needed().await? {
        info!("Database initialized from bootstrap script.");
    }

    // --- 3. Migrate Any Remaining Plaintext Passwords ---
    // Guarded and idempotent; values that already parse as hashes are skipped.
    credentials::migrate_plaintext_passwords(db_adapter.as_ref()).await?;

    // --- 4. Build the Shared AppState & Router ---
    let app_state = AppState::new(db_adapter, config.clone());
    let app = router(app_state)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
