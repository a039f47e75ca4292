//! Configuration loading and data folder resolution
//!
//! Settings resolve in priority order: environment variable, TOML config
//! file, OS-dependent compiled default.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Settings read from the optional TOML config file
/// (`~/.config/libris/config.toml`, or `/etc/libris/config.toml` on Linux).
///
/// Every field is optional; missing fields fall back to compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the SQLite database
    pub data_folder: Option<String>,
    /// HTTP listen port
    pub port: Option<u16>,
    /// Base URL of the external book-search API
    pub books_api_url: Option<String>,
    /// Request timeout for the external book-search API, in seconds
    pub books_api_timeout_secs: Option<u64>,
    /// Maximum number of entries held by the in-process book cache
    pub cache_capacity: Option<usize>,
    /// Book cache entry time-to-live, in seconds
    pub cache_ttl_secs: Option<u64>,
}

impl TomlConfig {
    /// Load the TOML config file if one exists; absent file yields defaults.
    pub fn load() -> Result<Self> {
        let path = match config_file_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Self::default()),
        };

        let content = std::fs::read_to_string(&path)?;
        let config = toml::from_str::<Self>(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

        tracing::info!("Loaded config file: {}", path.display());
        Ok(config)
    }

    /// Parse config from a TOML string (used by tests and tooling).
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }
}

/// Get the configuration file path for the platform
pub fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("libris").join("config.toml"));

    if cfg!(target_os = "linux") {
        // Prefer ~/.config/libris/config.toml, fall back to /etc/libris/config.toml
        if let Some(path) = &user_config {
            if path.exists() {
                return user_config;
            }
        }
        let system_config = PathBuf::from("/etc/libris/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
        user_config
    } else {
        user_config
    }
}

/// Resolve the data folder following priority order:
/// 1. Environment variable (`LIBRIS_DATA_FOLDER`)
/// 2. TOML config file
/// 3. OS-dependent compiled default
pub fn resolve_data_folder(toml_config: &TomlConfig) -> PathBuf {
    if let Ok(path) = std::env::var("LIBRIS_DATA_FOLDER") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(folder) = &toml_config.data_folder {
        if !folder.trim().is_empty() {
            return PathBuf::from(folder);
        }
    }

    default_data_folder()
}

/// OS-dependent default data folder path
fn default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/libris
        dirs::data_local_dir()
            .map(|d| d.join("libris"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/libris"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/libris
        dirs::data_dir()
            .map(|d| d.join("libris"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/libris"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\libris
        dirs::data_local_dir()
            .map(|d| d.join("libris"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\libris"))
    } else {
        PathBuf::from("./libris_data")
    }
}

/// Ensure the data folder exists, creating it if missing
pub fn ensure_data_folder(path: &std::path::Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        tracing::info!("Created data folder: {}", path.display());
    }
    Ok(())
}
