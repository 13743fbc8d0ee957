//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::debug;

use linkpeek_core::types::{LinkPreview, TargetUrl};

use crate::dto::HealthResponse;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

fn json_payload(payload: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], payload).into_response()
}

/// GET /link_resolver/:url
///
/// Input that does not decode to an http(s) URL is answered with the
/// `invalidURL` payload right away, without touching the cache.
pub async fn resolve_link(
    State(state): State<Arc<AppState>>,
    url: std::result::Result<Path<String>, PathRejection>,
) -> Result<Response> {
    let target = match url.map(|Path(raw)| TargetUrl::parse(&raw)) {
        Ok(Ok(target)) => target,
        Ok(Err(e)) => {
            debug!(error = %e, "Rejected link");
            return Ok(json_payload(LinkPreview::invalid_url().encode()));
        }
        Err(rejection) => {
            debug!(error = %rejection, "Undecodable link");
            return Ok(json_payload(LinkPreview::invalid_url().encode()));
        }
    };

    let key = target.cache_key();
    let ttl = state.config.cache.default_ttl();
    let fetcher = Arc::clone(&state.fetcher);

    let payload = state
        .coalescer
        .resolve(&key, ttl, move || async move { fetcher.fetch(&target).await })
        .await?;

    Ok(json_payload(payload))
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        in_flight: state.coalescer.in_flight(),
        cached_entries: state.coalescer.cache().len(),
    })
}
