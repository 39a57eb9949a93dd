//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the StateStore trait.
//! The visited table is append-only. The store remembers which URLs it has
//! already written, so saving a checkpoint only inserts the new ones.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{StateStore, StorageError, StorageResult};
use crate::storage::Checkpoint;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::path::Path;

const CURRENT_LEVEL: &str = "current";
const NEXT_LEVEL: &str = "next";

/// SQLite checkpoint backend
pub struct SqliteStateStore {
    conn: Connection,
    persisted: HashSet<String>,
}

impl SqliteStateStore {
    /// Opens (or creates) the checkpoint database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        Self::with_connection(conn)
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        initialize_schema(&conn)?;

        let mut store = Self {
            conn,
            persisted: HashSet::new(),
        };
        store.persisted = store.visited_urls()?.into_iter().collect();
        Ok(store)
    }

    fn horizon_urls(&self, level: &str) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM horizon WHERE level = ?1 ORDER BY url")?;

        let urls = stmt
            .query_map(params![level], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(urls)
    }

    fn visited_urls(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT url FROM visited ORDER BY url")?;

        let urls = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(urls)
    }
}

impl StateStore for SqliteStateStore {
    fn load(&self) -> StorageResult<Option<Checkpoint>> {
        let meta = self
            .conn
            .query_row(
                "SELECT depth, saved_at FROM checkpoint_meta WHERE id = 1",
                [],
                |row| Ok((row.get::<_, u32>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;

        let Some((depth, saved_at)) = meta else {
            return Ok(None);
        };

        let saved_at = saved_at
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| StorageError::Corrupt(format!("saved_at '{}': {}", s, e)))
            })
            .transpose()?;

        Ok(Some(Checkpoint {
            visited: self.visited_urls()?,
            horizon: self.horizon_urls(CURRENT_LEVEL)?,
            depth,
            next_horizon: self.horizon_urls(NEXT_LEVEL)?,
            saved_at,
        }))
    }

    fn save(&mut self, checkpoint: &Checkpoint) -> StorageResult<()> {
        let saved_at = checkpoint
            .saved_at
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Nanos, true));

        let new_visited: Vec<&String> = checkpoint
            .visited
            .iter()
            .filter(|url| !self.persisted.contains(*url))
            .collect();

        let tx = self.conn.transaction()?;
        {
            let mut insert_visited = tx.prepare("INSERT OR IGNORE INTO visited (url) VALUES (?1)")?;
            for url in &new_visited {
                insert_visited.execute(params![url])?;
            }

            tx.execute("DELETE FROM horizon", [])?;

            let mut insert_horizon =
                tx.prepare("INSERT OR IGNORE INTO horizon (url, level) VALUES (?1, ?2)")?;
            for url in &checkpoint.horizon {
                insert_horizon.execute(params![url, CURRENT_LEVEL])?;
            }
            for url in &checkpoint.next_horizon {
                insert_horizon.execute(params![url, NEXT_LEVEL])?;
            }

            tx.execute(
                "INSERT INTO checkpoint_meta (id, depth, saved_at) VALUES (1, ?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET depth = excluded.depth, saved_at = excluded.saved_at",
                params![checkpoint.depth, saved_at],
            )?;
        }
        tx.commit()?;

        self.persisted.extend(new_visited.into_iter().cloned());
        Ok(())
    }
}
