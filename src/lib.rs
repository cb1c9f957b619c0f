//! Term-Harvest: an incremental search-term crawler
//!
//! This crate walks the paginated "top queries" listing of a job site, discovers
//! distinct search terms, fetches the job results for every term it has not seen
//! before and appends normalized `term,title` records to a CSV file.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod state;
pub mod text;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Term-Harvest operations
///
/// Every variant is fatal for a crawl run. A detail page without results is
/// not an error and never shows up here.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Extraction failed for {url}: {source}")]
    Extraction {
        url: String,
        source: extract::ExtractError,
    },

    #[error("Failed to write results to {}: {source}", .path.display())]
    Sink {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to seed ledger from {}: {source}", .path.display())]
    LedgerSeed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
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

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{url}': {message}")]
    Parse { url: String, message: String },

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for Term-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlOutcome};
pub use extract::{Query, ResultRecord};
pub use output::{CrawlStats, ResultSink, StatsSnapshot};
pub use state::{Ledger, LedgerSeed};
