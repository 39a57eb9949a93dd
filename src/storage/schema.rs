//! Database schema for the SQLite checkpoint store

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Single-row checkpoint header
CREATE TABLE IF NOT EXISTS checkpoint_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    depth INTEGER NOT NULL,
    saved_at TEXT
);

-- URLs already dispatched to the fetcher; only ever grows
CREATE TABLE IF NOT EXISTS visited (
    url TEXT PRIMARY KEY
);

-- Pending URLs for the current level and the one after it
CREATE TABLE IF NOT EXISTS horizon (
    url TEXT NOT NULL,
    level TEXT NOT NULL CHECK (level IN ('current', 'next')),
    PRIMARY KEY (url, level)
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
