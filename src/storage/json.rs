//! JSON checkpoint file
//!
//! The file holds one pretty-printed [`Checkpoint`] object. Saves go to a
//! sibling temporary file that is renamed over the target, so an interrupted
//! save leaves the previous checkpoint intact.

use crate::storage::traits::{StateStore, StorageResult};
use crate::storage::Checkpoint;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Checkpoint store backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    /// Creates a store for the given file; the file need not exist yet
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> StorageResult<Option<Checkpoint>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&mut self, checkpoint: &Checkpoint) -> StorageResult<()> {
        let content = serde_json::to_string_pretty(checkpoint)?;
        let temp = self.temp_path();
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
