//! Storage module for persisting crawl checkpoints
//!
//! A checkpoint is the visited set, the pending horizon and the current depth.
//! Two backends implement [`StateStore`]:
//! - `JsonStateStore`: a single JSON document, the canonical format
//! - `SqliteStateStore`: the same checkpoint kept in an SQLite database
//!
//! [`open_state_store`] picks the backend from the file extension.

mod json;
mod schema;
mod sqlite;
mod traits;

pub use json::JsonStateStore;
pub use sqlite::SqliteStateStore;
pub use traits::{StateStore, StorageError, StorageResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Snapshot of crawl progress
///
/// `visited`, `horizon` and `depth` are the canonical fields. `next_horizon`
/// holds links already collected for the following level when a level is
/// interrupted between batches; it is empty at level boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// URLs already dispatched to the fetcher
    pub visited: Vec<String>,

    /// URLs still pending at `depth`
    pub horizon: Vec<String>,

    /// Level the horizon belongs to
    pub depth: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_horizon: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Opens the state store backing a resume file
///
/// Files ending in `.db`, `.sqlite` or `.sqlite3` use SQLite; anything else
/// is treated as JSON.
pub fn open_state_store(path: &Path) -> StorageResult<Box<dyn StateStore + Send>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("db") | Some("sqlite") | Some("sqlite3") => {
            tracing::debug!("Using SQLite checkpoint store at {}", path.display());
            Ok(Box::new(SqliteStateStore::new(path)?))
        }
        _ => {
            tracing::debug!("Using JSON checkpoint store at {}", path.display());
            Ok(Box::new(JsonStateStore::new(path)))
        }
    }
}
