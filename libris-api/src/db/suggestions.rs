//! Suggestion persistence
//!
//! Links a user to a recommended book plus the reason text from the
//! recommendation flow. A user is never suggested the same book twice:
//! the (user_id, book_external_id) unique constraint silently drops
//! duplicates via insert-or-skip.

use anyhow::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// One stored suggestion, joined with the book it points at
#[derive(Debug, Clone, Serialize)]
pub struct StoredSuggestion {
    pub book_external_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub reason: String,
    pub created_at: String,
}

/// Insert a batch of (book_external_id, reason) pairs for one user in a
/// single transaction, skipping pairs the user already has. Returns the
/// number of rows actually inserted.
pub async fn insert_suggestions(
    pool: &SqlitePool,
    user_id: Uuid,
    items: &[(String, String)],
) -> Result<u64> {
    if items.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for (book_external_id, reason) in items {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO suggestions (user_id, book_external_id, reason)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id.to_string())
        .bind(book_external_id)
        .bind(reason)
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;

    tracing::debug!(
        user_id = %user_id,
        requested = items.len(),
        inserted,
        "Stored suggestion batch"
    );

    Ok(inserted)
}

/// Load a user's stored suggestions, newest first
pub async fn suggestions_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<StoredSuggestion>> {
    let rows = sqlx::query(
        r#"
        SELECT s.book_external_id, s.reason, s.created_at, b.title, b.authors
        FROM suggestions s
        JOIN books b ON s.book_external_id = b.external_id
        WHERE s.user_id = ?
        ORDER BY s.created_at DESC, s.id DESC
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            let authors_json: String = row.get("authors");
            let authors: Vec<String> = serde_json::from_str(&authors_json)?;
            Ok(StoredSuggestion {
                book_external_id: row.get("book_external_id"),
                title: row.get("title"),
                authors,
                reason: row.get("reason"),
                created_at: row.get("created_at"),
            })
        })
        .collect()
}
