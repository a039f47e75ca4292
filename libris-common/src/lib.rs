//! # Libris Common Library
//!
//! Shared code for the libris backend:
//! - Common error and result types
//! - Configuration file loading and data folder resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
