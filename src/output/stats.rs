//! Crawl statistics
//!
//! The coordinator updates a [`CrawlStatistics`] after every batch and
//! returns it when the crawl ends.

use crate::state::PageState;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Count of visited pages by outcome
    pub pages_by_state: BTreeMap<PageState, u64>,

    /// Product records written to the output
    pub records_written: u64,

    /// Batches dispatched to the worker pool
    pub batches: u64,

    /// Levels fully drained in this run
    pub levels_completed: u32,

    /// True when the run started from a checkpoint
    pub resumed: bool,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one visited page
    pub fn record_page(&mut self, state: PageState) {
        *self.pages_by_state.entry(state).or_insert(0) += 1;
    }

    /// Number of pages visited in this run
    pub fn total_pages(&self) -> u64 {
        self.pages_by_state.values().sum()
    }

    pub fn pages_in(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Pages that ended in an error state
    pub fn total_errors(&self) -> u64 {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| state.is_error())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Logs the statistics at info level
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!(
        "Crawl statistics: {} pages visited in {} batches, {} levels completed{}",
        stats.total_pages(),
        stats.batches,
        stats.levels_completed,
        if stats.resumed { " (resumed)" } else { "" }
    );

    for state in PageState::all_states() {
        tracing::info!("  {}: {}", state, stats.pages_in(state));
    }

    tracing::info!(
        "Product records written: {} ({} pages with errors)",
        stats.records_written,
        stats.total_errors()
    );
}
