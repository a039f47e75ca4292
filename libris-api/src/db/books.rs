//! Book persistence
//!
//! Durable book records keyed by the external search-service identifier.
//! At most one row exists per external id; concurrent resolution races are
//! absorbed by the two-step upsert in [`save_book`].

use anyhow::{anyhow, Result};
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// Persisted book record
#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub id: i64,
    pub external_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub thumbnail: String,
    pub small_thumbnail: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Book data as resolved from the external search service, before it has
/// a database row. Optional fields are empty strings, never null.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub external_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub thumbnail: String,
    pub small_thumbnail: String,
}

const BOOK_COLUMNS: &str = "id, external_id, title, authors, description, \
                            thumbnail, small_thumbnail, created_at, updated_at";

fn row_to_book(row: &sqlx::sqlite::SqliteRow) -> Result<Book> {
    let authors_json: String = row.get("authors");
    let authors: Vec<String> = serde_json::from_str(&authors_json)
        .map_err(|e| anyhow!("Malformed authors column: {}", e))?;

    Ok(Book {
        id: row.get("id"),
        external_id: row.get("external_id"),
        title: row.get("title"),
        authors,
        description: row.get("description"),
        thumbnail: row.get("thumbnail"),
        small_thumbnail: row.get("small_thumbnail"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Load book by external identifier
pub async fn find_by_external_id(pool: &SqlitePool, external_id: &str) -> Result<Option<Book>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM books WHERE external_id = ?",
        BOOK_COLUMNS
    ))
    .bind(external_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(row_to_book).transpose()
}

/// Fuzzy lookup by title and authors.
///
/// A row matches when its title case-insensitively contains the query title
/// (or vice versa) and, if any authors were supplied, at least one supplied
/// author containment-matches one of the stored authors. Among matches the
/// row with the longest description wins; ties go to the lowest id.
///
/// Rows are scanned in preference order with title and author folding done
/// in Rust: SQLite's lower() only folds ASCII, which would miss accented or
/// non-Latin titles. The scan is unbounded so a matching row cannot be
/// shadowed by higher-ranked rows that fail the author filter.
pub async fn find_by_title_authors(
    pool: &SqlitePool,
    title: &str,
    authors: &[String],
) -> Result<Option<Book>> {
    let query_title = title.trim().to_lowercase();
    if query_title.is_empty() {
        return Ok(None);
    }

    let rows = sqlx::query(&format!(
        "SELECT {} FROM books ORDER BY length(description) DESC, id ASC",
        BOOK_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    for row in &rows {
        let book = row_to_book(row)?;
        let stored_title = book.title.to_lowercase();
        let title_matches = !stored_title.is_empty()
            && (stored_title.contains(&query_title) || query_title.contains(&stored_title));

        if title_matches && authors_match(&book.authors, authors) {
            return Ok(Some(book));
        }
    }

    Ok(None)
}

/// True when no query authors were supplied, or at least one query author
/// case-insensitively containment-matches a stored author.
fn authors_match(stored: &[String], query: &[String]) -> bool {
    if query.iter().all(|a| a.trim().is_empty()) {
        return true;
    }

    query.iter().any(|q| {
        let q = q.trim().to_lowercase();
        !q.is_empty()
            && stored.iter().any(|s| {
                let s = s.to_lowercase();
                s.contains(&q) || q.contains(&s)
            })
    })
}

/// Plain insert. A unique violation on `external_id` surfaces as the sqlx
/// error so callers can recover from the concurrent-resolution race.
pub async fn insert_book(pool: &SqlitePool, book: &NewBook) -> std::result::Result<(), sqlx::Error> {
    let authors_json =
        serde_json::to_string(&book.authors).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    sqlx::query(
        r#"
        INSERT INTO books (external_id, title, authors, description, thumbnail, small_thumbnail)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&book.external_id)
    .bind(&book.title)
    .bind(&authors_json)
    .bind(&book.description)
    .bind(&book.thumbnail)
    .bind(&book.small_thumbnail)
    .execute(pool)
    .await?;

    Ok(())
}

/// Refresh the mutable fields of an existing row
async fn update_book(pool: &SqlitePool, book: &NewBook) -> Result<()> {
    let authors_json = serde_json::to_string(&book.authors)?;

    sqlx::query(
        r#"
        UPDATE books
        SET title = ?, authors = ?, description = ?, thumbnail = ?, small_thumbnail = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE external_id = ?
        "#,
    )
    .bind(&book.title)
    .bind(&authors_json)
    .bind(&book.description)
    .bind(&book.thumbnail)
    .bind(&book.small_thumbnail)
    .bind(&book.external_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Save a resolved book, returning the resulting row.
///
/// Explicit two-step upsert: attempt the insert; on a unique violation
/// (another request persisted the same external id first) refresh the
/// mutable fields instead, then re-read by external id. Kept as two
/// statements rather than a storage-specific ON CONFLICT clause.
pub async fn save_book(pool: &SqlitePool, book: &NewBook) -> Result<Book> {
    match insert_book(pool, book).await {
        Ok(()) => {}
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            tracing::debug!(
                external_id = %book.external_id,
                "Insert raced an existing row, updating instead"
            );
            update_book(pool, book).await?;
        }
        Err(e) => return Err(e.into()),
    }

    find_by_external_id(pool, &book.external_id)
        .await?
        .ok_or_else(|| anyhow!("Book {} vanished after save", book.external_id))
}
