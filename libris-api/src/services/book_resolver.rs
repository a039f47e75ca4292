//! Book resolution orchestrator
//!
//! Composes the cache, persistence and external tiers into one
//! find-or-create operation with strict tier precedence: cache, then
//! database fuzzy match, then the external search API. Hits from the
//! slower tiers are written through to the cache, and external hits are
//! persisted before returning.

use crate::db::books::{self, Book};
use crate::services::book_cache::BookCache;
use crate::services::google_books::GoogleBooksClient;
use anyhow::Result;
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Which tier satisfied a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Database,
    External,
}

/// A resolved book with its provenance tag
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub source: Source,
    pub book: Book,
}

/// Multi-tier book resolver
pub struct BookResolver {
    db: SqlitePool,
    cache: Arc<BookCache>,
    books_client: Arc<GoogleBooksClient>,
}

impl BookResolver {
    pub fn new(db: SqlitePool, cache: Arc<BookCache>, books_client: Arc<GoogleBooksClient>) -> Self {
        Self {
            db,
            cache,
            books_client,
        }
    }

    /// Resolve a (title, authors) query to a canonical book record,
    /// creating one from the external API on first sight.
    ///
    /// Returns None when no tier can produce a match. External failures are
    /// logged and collapsed into None rather than surfaced to the caller.
    ///
    /// Two concurrent calls for the same never-seen query may both reach
    /// the external API; the unique constraint on external_id plus the
    /// update-then-re-read in save_book guarantees a single row survives.
    pub async fn find_or_add(&self, title: &str, authors: &[String]) -> Result<Option<Resolution>> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        // Tier 1: in-process cache
        if let Some(book) = self.cache.get(title, authors) {
            tracing::debug!(title = %title, "Cache hit");
            return Ok(Some(Resolution {
                source: Source::Cache,
                book,
            }));
        }

        // Tier 2: database fuzzy match
        if let Some(book) = books::find_by_title_authors(&self.db, title, authors).await? {
            tracing::debug!(title = %title, external_id = %book.external_id, "Database hit");
            self.cache.put(title, authors, book.clone());
            return Ok(Some(Resolution {
                source: Source::Database,
                book,
            }));
        }

        // Tier 3: external search API
        let resolved = match self.books_client.resolve(title, authors).await {
            Ok(resolved) => resolved,
            Err(e) => {
                // Availability over accuracy: a flaky external service reads
                // as "not found", the caller is never shown a distinct error.
                tracing::warn!(title = %title, error = %e, "External book lookup failed");
                return Ok(None);
            }
        };

        let Some(new_book) = resolved else {
            tracing::debug!(title = %title, "No external match");
            return Ok(None);
        };

        let book = books::save_book(&self.db, &new_book).await?;
        self.cache.put(title, authors, book.clone());

        tracing::info!(
            title = %title,
            external_id = %book.external_id,
            "Resolved and persisted book from external API"
        );

        Ok(Some(Resolution {
            source: Source::External,
            book,
        }))
    }
}
