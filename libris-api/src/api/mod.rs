//! HTTP API handlers for libris-api

pub mod books;
pub mod cache;
pub mod health;
pub mod recommendations;

pub use books::book_routes;
pub use cache::cache_routes;
pub use health::health_routes;
pub use recommendations::recommendation_routes;
