//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: The phases of the breadth-first crawl loop
//! - `PageState`: How the visit of an individual page ended

mod crawl_phase;
mod page_state;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use page_state::PageState;
