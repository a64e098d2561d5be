//! services/web/src/web/download.rs
//!
//! Sandboxed file downloads, confined to the configured docs directory.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::WebError;
use crate::web::state::AppState;

#[derive(Deserialize)]
pub struct DownloadParams {
    pub file: Option<String>,
}

/// GET /download?file= - stream a file from the docs directory as an attachment.
pub async fn download_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, WebError> {
    let file = params
        .file
        .ok_or_else(|| WebError::InvalidInput("missing 'file' parameter".to_string()))?;
    serve_from(&state.config.docs_dir, &file).await
}

/// Resolves `name` under `base` and serves it, refusing any path whose
/// canonical form escapes the canonical base directory.
pub async fn serve_from(base: &Path, name: &str) -> Result<Response, WebError> {
    let canonical_base = tokio::fs::canonicalize(base)
        .await
        .map_err(|e| WebError::Internal(format!("docs directory unavailable: {e}")))?;

    // Canonicalization resolves `..` segments and symlinks, so the
    // containment check below sees the real target.
    let canonical = tokio::fs::canonicalize(canonical_base.join(name))
        .await
        .map_err(map_io_error)?;

    if !canonical.starts_with(&canonical_base) {
        return Err(WebError::Forbidden);
    }

    let bytes = tokio::fs::read(&canonical).await.map_err(map_io_error)?;

    let filename = canonical
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download");

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

fn map_io_error(e: std::io::Error) -> WebError {
    match e.kind() {
        std::io::ErrorKind::NotFound => WebError::NotFound,
        std::io::ErrorKind::PermissionDenied => WebError::Forbidden,
        _ => WebError::Internal(e.to_string()),
    }
}
