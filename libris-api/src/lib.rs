//! libris-api library interface
//!
//! Exposes the book resolution pipeline and router construction for
//! integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::services::{BookCache, BookResolver, GoogleBooksClient, RecommendationResolver};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// In-process book cache
    pub book_cache: Arc<BookCache>,
    /// Multi-tier book resolver
    pub resolver: Arc<BookResolver>,
    /// Batch recommendation resolver
    pub recommendations: Arc<RecommendationResolver>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        book_cache: Arc<BookCache>,
        books_client: Arc<GoogleBooksClient>,
    ) -> Self {
        let resolver = Arc::new(BookResolver::new(
            db.clone(),
            Arc::clone(&book_cache),
            books_client,
        ));
        let recommendations = Arc::new(RecommendationResolver::new(
            db.clone(),
            Arc::clone(&resolver),
        ));

        Self {
            db,
            book_cache,
            resolver,
            recommendations,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::book_routes())
        .merge(api::recommendation_routes())
        .merge(api::cache_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
