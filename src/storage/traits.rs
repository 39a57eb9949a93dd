//! Storage traits and error types
//!
//! This module defines the trait interface for checkpoint backends and
//! associated error types.

use crate::storage::Checkpoint;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt checkpoint: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for checkpoint backends
///
/// A store holds at most one checkpoint: the latest one saved. Loading from
/// a store that has never been saved to is not an error.
pub trait StateStore {
    /// Loads the latest checkpoint
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Checkpoint))` - A prior run left state behind
    /// * `Ok(None)` - No prior state; the crawl starts from the seed
    fn load(&self) -> StorageResult<Option<Checkpoint>>;

    /// Replaces the stored checkpoint
    fn save(&mut self, checkpoint: &Checkpoint) -> StorageResult<()>;
}
