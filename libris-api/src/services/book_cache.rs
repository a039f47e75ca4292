//! In-process book cache
//!
//! Bounded LRU mapping from normalized (title, authors) keys to Book
//! snapshots, with a fixed time-to-live per entry. A hit refreshes the
//! entry's recency for eviction ordering but does not extend its absolute
//! expiry (no sliding window). Lookups are synchronous and never fail;
//! absence is a normal outcome.

use crate::db::books::Book;
use crate::services::normalizer::normalize;
use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry {
    book: Book,
    inserted_at: Instant,
}

/// One row of the operational cache listing
#[derive(Debug, Serialize)]
pub struct CacheEntryInfo {
    pub cache_key: String,
    pub title: String,
    pub authors: Vec<String>,
    pub remaining_ttl_secs: u64,
}

/// Capacity-bounded, expiring book cache
pub struct BookCache {
    inner: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl BookCache {
    /// Create a cache holding at most `capacity` entries, each live for `ttl`
    /// from insertion.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, CacheEntry>> {
        // Recover from poisoning: cache state is disposable, a panicked
        // writer cannot leave a partially applied entry behind.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Look up a cached book. Returns None if absent or expired. A live hit
    /// moves the entry to most-recently-used.
    pub fn get(&self, title: &str, authors: &[String]) -> Option<Book> {
        let key = normalize(title, authors);
        let mut cache = self.lock();

        if let Some(entry) = cache.get(&key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.book.clone());
            }
            // Expired, drop it
            cache.pop(&key);
        }
        None
    }

    /// Insert or replace a cached book snapshot. Replacing restarts the TTL.
    pub fn put(&self, title: &str, authors: &[String], book: Book) {
        let key = normalize(title, authors);
        self.lock().put(
            key,
            CacheEntry {
                book,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of entries currently held (expired entries included until
    /// their next lookup or eviction).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Listing of current entries for the operational endpoint.
    pub fn contents(&self) -> Vec<CacheEntryInfo> {
        let cache = self.lock();
        cache
            .iter()
            .map(|(key, entry)| CacheEntryInfo {
                cache_key: key.clone(),
                title: entry.book.title.clone(),
                authors: entry.book.authors.clone(),
                remaining_ttl_secs: self
                    .ttl
                    .saturating_sub(entry.inserted_at.elapsed())
                    .as_secs(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(external_id: &str, title: &str) -> Book {
        Book {
            id: 1,
            external_id: external_id.to_string(),
            title: title.to_string(),
            authors: vec!["Test Author".to_string()],
            description: String::new(),
            thumbnail: String::new(),
            small_thumbnail: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn authors(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_hit_after_put() {
        let cache = BookCache::new(10, Duration::from_secs(60));
        cache.put("Dune", &authors(&["Frank Herbert"]), book("id-1", "Dune"));

        let hit = cache.get("Dune", &authors(&["Frank Herbert"])).unwrap();
        assert_eq!(hit.external_id, "id-1");
    }

    #[test]
    fn test_miss_when_absent() {
        let cache = BookCache::new(10, Duration::from_secs(60));
        assert!(cache.get("Dune", &[]).is_none());
    }

    #[test]
    fn test_author_order_irrelevant() {
        let cache = BookCache::new(10, Duration::from_secs(60));
        cache.put(
            "Good Omens",
            &authors(&["Terry Pratchett", "Neil Gaiman"]),
            book("id-2", "Good Omens"),
        );

        assert!(cache
            .get("Good Omens", &authors(&["Neil Gaiman", "Terry Pratchett"]))
            .is_some());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = BookCache::new(10, Duration::from_millis(40));
        cache.put("Dune", &[], book("id-1", "Dune"));
        assert!(cache.get("Dune", &[]).is_some());

        std::thread::sleep(Duration::from_millis(60));
        assert!(cache.get("Dune", &[]).is_none());
    }

    #[test]
    fn test_capacity_eviction_lru_first() {
        let cache = BookCache::new(2, Duration::from_secs(60));
        cache.put("One", &[], book("id-1", "One"));
        cache.put("Two", &[], book("id-2", "Two"));
        cache.put("Three", &[], book("id-3", "Three"));

        assert!(cache.get("One", &[]).is_none());
        assert!(cache.get("Two", &[]).is_some());
        assert!(cache.get("Three", &[]).is_some());
    }

    #[test]
    fn test_get_refreshes_recency() {
        let cache = BookCache::new(2, Duration::from_secs(60));
        cache.put("One", &[], book("id-1", "One"));
        cache.put("Two", &[], book("id-2", "Two"));

        // Touch "One" so "Two" becomes least recently used
        assert!(cache.get("One", &[]).is_some());
        cache.put("Three", &[], book("id-3", "Three"));

        assert!(cache.get("One", &[]).is_some());
        assert!(cache.get("Two", &[]).is_none());
    }

    #[test]
    fn test_clear() {
        let cache = BookCache::new(10, Duration::from_secs(60));
        cache.put("Dune", &[], book("id-1", "Dune"));
        cache.put("Emma", &[], book("id-2", "Emma"));

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("Dune", &[]).is_none());
    }

    #[test]
    fn test_contents_listing() {
        let cache = BookCache::new(10, Duration::from_secs(60));
        cache.put("Dune", &authors(&["Frank Herbert"]), book("id-1", "Dune"));

        let contents = cache.contents();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].title, "Dune");
        assert!(contents[0].remaining_ttl_secs <= 60);
    }
}
