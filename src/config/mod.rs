//! Configuration module for the product crawler
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so running without a file
//! is equivalent to loading an empty one.
//!
//! # Example
//!
//! ```no_run
//! use product_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Crawling {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, SiteConfig, UserAgentConfig, DEFAULT_BASE_URL, DEFAULT_BATCH_CAPACITY,
    DEFAULT_PRODUCT_SUFFIX, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY_MS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{clamp_depth, validate as validate_config};
