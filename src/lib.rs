//! Ripple-Sitemap: a single-host sitemap generator
//!
//! This crate crawls every page reachable from a seed URL on one host,
//! writes a sitemap protocol document for the pages it could fetch, and
//! appends a record of each completed run to a history store.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Ripple-Sitemap operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Seed URL has no host: {0}")]
    MissingHost(String),

    #[error("No URLs discovered from {seed}")]
    NoUrlsDiscovered { seed: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    #[error("History error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Crawl worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
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

/// Reasons a single page could not be fetched
///
/// These never fail a run on their own; the page is left out of the results.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },
}

/// Errors raised while writing the sitemap or the history store
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("XML serialization error: {0}")]
    Xml(String),

    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: String,
        source: tempfile::PersistError,
    },
}

impl WriteError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Result type alias for Ripple-Sitemap operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for a single page fetch
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for artifact writes
pub type WriteResult<T> = std::result::Result<T, WriteError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_once, CrawlEngine, CrawlOutcome, RunReport};
pub use state::CrawlPhase;
pub use url::{normalize_link, JoinStrategy};
