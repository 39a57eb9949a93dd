//! Phases of the breadth-first crawl loop

use std::fmt;

/// Where the coordinator is in its crawl loop
///
/// ```text
/// Seeding -> LevelActive -> LevelDraining -> LevelActive -> ... -> Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Building the frontier from the seed or a checkpoint
    Seeding,

    /// Deciding whether the current level has another batch
    LevelActive,

    /// A batch is dispatched to the worker pool
    LevelDraining,

    /// Depth exhausted or nothing left to visit
    Done,
}

impl CrawlPhase {
    /// Returns true once the crawl has finished
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Seeding => "seeding",
            Self::LevelActive => "level_active",
            Self::LevelDraining => "level_draining",
            Self::Done => "done",
        };
        write!(f, "{}", name)
    }
}
