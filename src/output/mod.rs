//! Output module for product records and crawl statistics
//!
//! This module handles:
//! - Appending product records to the CSV output as they are found
//! - Reading records back (used to inspect accumulated output)
//! - Recording and reporting crawl statistics

mod csv_writer;
pub mod stats;

pub use csv_writer::{read_records, RecordWriter};
pub use stats::{log_statistics, CrawlStatistics};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A product page found during the crawl
///
/// Serialized as one CSV row: `product_name,page_title,url`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_name: String,
    pub page_title: String,
    pub url: String,
}
