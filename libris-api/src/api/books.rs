//! Book lookup endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::services::Resolution;
use crate::AppState;

/// Query parameters for GET /books/find
#[derive(Debug, Deserialize)]
pub struct FindBookParams {
    pub title: Option<String>,
    /// Comma-separated author names
    pub authors: Option<String>,
}

/// Split a comma-separated author list, dropping empty segments
fn parse_authors(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

/// GET /books/find?title=&authors=
///
/// Resolves a (title, authors) query through cache, database and the
/// external search API. 404 when no tier produces a match.
pub async fn find_book(
    State(state): State<AppState>,
    Query(params): Query<FindBookParams>,
) -> ApiResult<Json<Resolution>> {
    let title = params
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing required parameter: title".to_string()))?;

    let authors = parse_authors(params.authors.as_deref());

    match state.resolver.find_or_add(title, &authors).await? {
        Some(resolution) => Ok(Json(resolution)),
        None => Err(ApiError::NotFound("Book not found".to_string())),
    }
}

/// Build book routes
pub fn book_routes() -> Router<AppState> {
    Router::new().route("/books/find", get(find_book))
}
