//! Site-Sift: a breadth-limited contact crawler
//!
//! For every seed website in an input list this crate crawls a bounded number of
//! same-origin pages, extracts contact signals (emails, phone numbers and social
//! profile links) and aggregates them into one result record per seed.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetcher;
pub mod input;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for run-level Site-Sift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Failed to acquire fetcher session: {0}")]
    ResourceAcquisition(#[source] fetcher::FetchError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),
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
}

/// Seed list errors
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read seed list {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Seed list {0} contains no seeds")]
    Empty(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Site-Sift operations
pub type Result<T> = std::result::Result<T, SiftError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl_seed, CancelFlag, CrawlSettings, Runner, RunSummary};
pub use extract::{extract, PageSignals, SocialPlatform};
pub use state::{AggregatedResult, CrawlState, SeedReport, SeedStatus};
pub use url::{normalize_seed, same_origin_links};
