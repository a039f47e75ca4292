//! Cache operational endpoints
//!
//! Inspection and reset hooks for the in-process book cache.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::services::CacheEntryInfo;
use crate::AppState;

/// GET /cache/contents
///
/// Current cache entries with remaining TTLs.
pub async fn cache_contents(State(state): State<AppState>) -> Json<Vec<CacheEntryInfo>> {
    Json(state.book_cache.contents())
}

/// Response for POST /cache/clear
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub status: String,
    pub cleared: usize,
}

/// POST /cache/clear
///
/// Drop all cache entries. Subsequent lookups fall through to the
/// database or the external API.
pub async fn cache_clear(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.book_cache.len();
    state.book_cache.clear();
    tracing::info!(cleared, "Book cache cleared");

    Json(ClearResponse {
        status: "ok".to_string(),
        cleared,
    })
}

/// Build cache routes
pub fn cache_routes() -> Router<AppState> {
    Router::new()
        .route("/cache/contents", get(cache_contents))
        .route("/cache/clear", post(cache_clear))
}
