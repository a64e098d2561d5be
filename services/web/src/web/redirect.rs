//! services/web/src/web/redirect.rs
//!
//! The `/redirect` endpoint, restricted to same-origin destinations.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Redirect;
use serde::Deserialize;
use url::Url;

use crate::error::WebError;
use crate::web::state::AppState;

#[derive(Deserialize)]
pub struct RedirectParams {
    pub destination: Option<String>,
}

/// GET /redirect?destination= - same-origin redirect only.
pub async fn redirect_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RedirectParams>,
) -> Result<Redirect, WebError> {
    let destination = params.destination.ok_or(WebError::InvalidDestination)?;
    let target = validate_destination(&destination, &state.config.public_host)?;
    Ok(Redirect::to(target.as_str()))
}

/// Accepts a destination only when it resolves to the serving host over
/// http(s).
///
/// Relative references are resolved against the serving host *before* the
/// comparison, which is what closes the protocol-relative (`//evil.example`)
/// bypass: after resolution there is always a concrete host to check.
///
/// The host must match the configured public host exactly. A destination
/// that names a port must name ours; one that leaves the port to the scheme
/// default is accepted on host match alone, so `https://<host>/x` stays
/// valid for a site configured with an explicit port.
pub fn validate_destination(destination: &str, public_host: &str) -> Result<Url, WebError> {
    let base = Url::parse(&format!("http://{public_host}/"))
        .map_err(|_| WebError::InvalidDestination)?;

    let resolved = Url::options()
        .base_url(Some(&base))
        .parse(destination)
        .map_err(|_| WebError::InvalidDestination)?;

    if !matches!(resolved.scheme(), "http" | "https") {
        return Err(WebError::InvalidDestination);
    }

    match (resolved.host_str(), base.host_str()) {
        (Some(host), Some(own_host)) if host == own_host => {}
        _ => return Err(WebError::InvalidDestination),
    }

    // `Url::port` is `None` for scheme-default ports; anything explicit must
    // be our own port, or the destination is a different origin.
    if resolved.port().is_some()
        && resolved.port_or_known_default() != base.port_or_known_default()
    {
        return Err(WebError::InvalidDestination);
    }

    Ok(resolved)
}
