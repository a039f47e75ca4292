//! Service settings for libris-api
//!
//! Each setting resolves environment variable first, then the TOML config
//! file, then the compiled default.

use libris_common::config::{resolve_data_folder, TomlConfig};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5740;
pub const DEFAULT_BOOKS_API_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;
/// 4 weeks
pub const DEFAULT_CACHE_TTL_SECS: u64 = 4 * 7 * 24 * 60 * 60;

/// Resolved service settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// HTTP listen port
    pub port: u16,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Base URL of the Google Books API; None keeps the client's default
    pub books_api_url: Option<String>,
    /// Request timeout for external lookups
    pub books_api_timeout: Duration,
    /// Book cache capacity (entries)
    pub cache_capacity: usize,
    /// Book cache entry time-to-live
    pub cache_ttl: Duration,
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    match std::env::var(name) {
        Ok(value) => match value.trim().parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::warn!("Ignoring unparsable {}: {:?}", name, value);
                None
            }
        },
        Err(_) => None,
    }
}

impl Settings {
    /// Resolve settings from environment and config file
    pub fn resolve() -> libris_common::Result<Self> {
        let toml_config = TomlConfig::load()?;
        Ok(Self::from_toml(&toml_config))
    }

    fn from_toml(toml_config: &TomlConfig) -> Self {
        let data_folder = resolve_data_folder(toml_config);

        let port = env_parse("LIBRIS_PORT")
            .or(toml_config.port)
            .unwrap_or(DEFAULT_PORT);

        let books_api_url = std::env::var("LIBRIS_BOOKS_API_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| toml_config.books_api_url.clone());

        let timeout_secs = env_parse("LIBRIS_BOOKS_API_TIMEOUT_SECS")
            .or(toml_config.books_api_timeout_secs)
            .unwrap_or(DEFAULT_BOOKS_API_TIMEOUT_SECS);

        let cache_capacity = env_parse("LIBRIS_CACHE_CAPACITY")
            .or(toml_config.cache_capacity)
            .unwrap_or(DEFAULT_CACHE_CAPACITY);

        let cache_ttl_secs = env_parse("LIBRIS_CACHE_TTL_SECS")
            .or(toml_config.cache_ttl_secs)
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);

        Self {
            port,
            database_path: data_folder.join("libris.db"),
            books_api_url,
            books_api_timeout: Duration::from_secs(timeout_secs),
            cache_capacity,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        }
    }
}
