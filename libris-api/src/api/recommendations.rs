//! Recommendation endpoints
//!
//! The recommendation flow upstream of this service produces
//! (title, authors, reason) triples; these endpoints turn them into
//! stored suggestions and read them back for display.

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::suggestions::{self, StoredSuggestion};
use crate::error::ApiResult;
use crate::services::Recommendation;
use crate::AppState;

/// Request body for POST /recommendations/resolve
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub user_id: Uuid,
    pub recommendations: Vec<Recommendation>,
}

/// POST /recommendations/resolve
///
/// Resolves each recommendation to a persisted book and stores the
/// successful ones as suggestions. Items that cannot be resolved are
/// dropped; an empty array is a valid response.
pub async fn resolve_recommendations(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> ApiResult<Json<Vec<StoredSuggestion>>> {
    let stored = state
        .recommendations
        .resolve_and_store(request.user_id, request.recommendations)
        .await?;

    Ok(Json(stored))
}

/// Query parameters for GET /recommendations
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub user_id: Uuid,
}

/// GET /recommendations?user_id=
///
/// A user's stored suggestions, newest first.
pub async fn list_recommendations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<StoredSuggestion>>> {
    let stored = suggestions::suggestions_for_user(&state.db, params.user_id).await?;
    Ok(Json(stored))
}

/// Build recommendation routes
pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/recommendations", get(list_recommendations))
        .route("/recommendations/resolve", post(resolve_recommendations))
}
