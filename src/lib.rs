//! Product Crawler: a resumable breadth-first product page crawler
//!
//! This crate crawls a single web site level by level from a seed path,
//! classifies every fetched page as a product page or not, and appends the
//! product name, page title and URL of each product page to a CSV file.
//! Crawl progress can be checkpointed so that an interrupted or
//! depth-limited crawl resumes without re-fetching visited pages.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
///
/// Only errors that make further progress impossible surface here. Failures
/// tied to a single page are recovered inside the crawler.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
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

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("URL {url} is not on site {site}")]
    OffSite { url: String, site: String },
}

/// Errors from a single fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Errors raised while extracting product fields from markup
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Expected markup not found: {0}")]
    NotFound(String),

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator};
pub use output::ProductRecord;
pub use state::{CrawlPhase, PageState};
pub use storage::Checkpoint;
pub use url::SiteScope;
