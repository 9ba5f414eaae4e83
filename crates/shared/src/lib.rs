//! Shared library for malscraper.
//!
//! This crate provides common functionality used by the scraper crate:
//! - Configuration management
//! - Record models (anime, user watch progress)
//! - Cache path layout
//! - Logging infrastructure

pub mod config;
pub mod logging;
pub mod models;
pub mod paths;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use models::*;
pub use paths::CachePaths;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
