//! Crawler module for fetching and classifying pages
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Product page classification
//! - HTML parsing for product fields and links
//! - The frontier and its batching
//! - Overall crawl coordination

mod classifier;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use classifier::is_product_page;
pub use coordinator::{run_crawl, visit_page, Coordinator, PageReport};
pub use fetcher::{build_http_client, FetchedPage, Fetcher};
pub use frontier::{take_batch, Frontier};
pub use parser::{extract_fields, extract_links, ProductFields};
