//! libris-api - Book resolution backend
//!
//! Resolves (title, authors) queries to canonical book records through a
//! three-tier pipeline (in-process cache, SQLite, Google Books API) and
//! stores per-user reading suggestions produced by the recommendation flow.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use libris_api::config::Settings;
use libris_api::services::{BookCache, GoogleBooksClient};
use libris_api::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting libris-api (book resolution backend)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve settings: environment, then TOML config, then defaults
    let settings = Settings::resolve()?;
    info!("Database: {}", settings.database_path.display());

    if let Some(parent) = settings.database_path.parent() {
        libris_common::config::ensure_data_folder(parent)?;
    }

    let db_pool = libris_api::db::init_database_pool(&settings.database_path).await?;
    info!("Database connection established");

    let book_cache = Arc::new(BookCache::new(settings.cache_capacity, settings.cache_ttl));
    info!(
        "Book cache initialized (capacity {}, ttl {}s)",
        settings.cache_capacity,
        settings.cache_ttl.as_secs()
    );

    let books_client = Arc::new(match &settings.books_api_url {
        Some(url) => GoogleBooksClient::with_base_url(url, settings.books_api_timeout)?,
        None => GoogleBooksClient::new(settings.books_api_timeout)?,
    });

    let state = AppState::new(db_pool, book_cache, books_client);
    let app = libris_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", settings.port)).await?;
    info!("Listening on http://127.0.0.1:{}", settings.port);
    info!("Health check: http://127.0.0.1:{}/health", settings.port);

    axum::serve(listener, app).await?;

    Ok(())
}
