//! Recommendation resolution
//!
//! Takes the (title, authors, reason) triples produced by the
//! recommendation flow, resolves each to a persisted book through the
//! orchestrator, and stores the surviving entries as suggestion rows in
//! one batched write. Items resolve independently: one failed lookup
//! drops that item only, never the batch.

use crate::db::suggestions::{self, StoredSuggestion};
use crate::services::book_resolver::BookResolver;
use anyhow::Result;
use futures::future::join_all;
use serde::Deserialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

/// One recommended book as received from the recommendation flow
#[derive(Debug, Clone, Deserialize)]
pub struct Recommendation {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub reason: String,
}

/// Batch resolver for recommended books
pub struct RecommendationResolver {
    db: SqlitePool,
    resolver: Arc<BookResolver>,
}

impl RecommendationResolver {
    pub fn new(db: SqlitePool, resolver: Arc<BookResolver>) -> Self {
        Self { db, resolver }
    }

    /// Resolve every recommendation and store the successful ones as
    /// suggestions for `user_id`.
    ///
    /// Item resolutions fan out concurrently; the suggestion write happens
    /// once, after all items have settled. Unresolvable items are dropped
    /// silently, and (user, book) pairs the user already has are skipped by
    /// the insert. An empty result is a valid outcome, not an error.
    pub async fn resolve_and_store(
        &self,
        user_id: Uuid,
        recommendations: Vec<Recommendation>,
    ) -> Result<Vec<StoredSuggestion>> {
        let lookups = recommendations.iter().map(|rec| {
            let resolver = Arc::clone(&self.resolver);
            async move { resolver.find_or_add(&rec.title, &rec.authors).await }
        });

        let results = join_all(lookups).await;

        let mut items: Vec<(String, String)> = Vec::new();
        for (rec, result) in recommendations.iter().zip(results) {
            match result {
                Ok(Some(resolution)) => {
                    items.push((resolution.book.external_id, rec.reason.clone()));
                }
                Ok(None) => {
                    tracing::debug!(title = %rec.title, "Dropping unresolvable recommendation");
                }
                Err(e) => {
                    tracing::warn!(title = %rec.title, error = %e, "Recommendation lookup failed");
                }
            }
        }

        suggestions::insert_suggestions(&self.db, user_id, &items).await?;

        // Read back the batch for authoritative stored state (created_at,
        // original reason where the pair already existed)
        let stored = suggestions::suggestions_for_user(&self.db, user_id).await?;
        Ok(stored
            .into_iter()
            .filter(|s| items.iter().any(|(id, _)| id == &s.book_external_id))
            .collect())
    }
}
