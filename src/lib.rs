//! Catalogue Harvester: a parts-catalogue crawler and normalizer
//!
//! This crate walks a manufacturer → category → model → part hierarchy of
//! HTML pages, turns the harvested parts of each manufacturer into dimension
//! and fact tables with surrogate keys, and appends them to SQLite.

pub mod catalogue;
pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Catalogue Harvester operations
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Expected '{container}' container missing on {url}")]
    MissingContainer {
        url: String,
        container: crawler::Container,
    },

    #[error("Normalization error: {0}")]
    Normalize(#[from] catalogue::NormalizeError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}' for {key}")]
    InvalidSelector { key: &'static str, selector: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("URL cannot carry path segments: {0}")]
    CannotBeABase(String),

    #[error("Empty path segment below {0}")]
    EmptySegment(String),
}

/// Result type alias for Catalogue Harvester operations
pub type Result<T> = std::result::Result<T, CatalogueError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use catalogue::{normalize_batch, NormalizedBatch, PartRow};
pub use config::Config;
pub use crawler::{run_harvest, Harvester};
pub use output::CrawlReport;
pub use storage::{CatalogueStore, SqliteStorage};
