//! Service modules for the book resolution pipeline

pub mod book_cache;
pub mod book_resolver;
pub mod google_books;
pub mod normalizer;
pub mod recommendation_resolver;

pub use book_cache::{BookCache, CacheEntryInfo};
pub use book_resolver::{BookResolver, Resolution, Source};
pub use google_books::{BooksApiError, GoogleBooksClient};
pub use recommendation_resolver::{Recommendation, RecommendationResolver};
