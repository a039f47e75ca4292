//! Shared test utilities
//!
//! In-memory and file-backed test databases, app state wiring against a
//! mock Google Books server, and response fixtures.
#![allow(dead_code)]

use libris_api::services::{BookCache, GoogleBooksClient};
use libris_api::AppState;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Single-connection in-memory database with the schema applied
pub async fn memory_pool() -> SqlitePool {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    libris_api::db::init_tables(&pool).await.unwrap();
    pool
}

/// File-backed database pool for tests exercising real write concurrency
pub async fn file_pool(dir: &Path) -> SqlitePool {
    libris_api::db::init_database_pool(&dir.join("test_libris.db"))
        .await
        .unwrap()
}

/// App state wired to the given pool and mock books server
pub fn test_state(pool: SqlitePool, books_api_url: &str) -> AppState {
    let cache = Arc::new(BookCache::new(100, Duration::from_secs(300)));
    let client = Arc::new(
        GoogleBooksClient::with_base_url(books_api_url, Duration::from_secs(2)).unwrap(),
    );
    AppState::new(pool, cache, client)
}

/// One volume in the Google Books response shape
pub fn volume_json(id: &str, title: &str, authors: &[&str], language: &str) -> Value {
    json!({
        "id": id,
        "volumeInfo": {
            "title": title,
            "authors": authors,
            "description": format!("Description of {}", title),
            "language": language,
            "imageLinks": {
                "thumbnail": format!("http://covers.test/{}.jpg", id),
                "smallThumbnail": format!("http://covers.test/{}-small.jpg", id)
            }
        }
    })
}

/// Mount a catch-all volumes response on the mock server
pub async fn mock_volumes(server: &MockServer, items: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/volumes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

/// Mount an empty volumes response (no candidates)
pub async fn mock_no_results(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/volumes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
}
