//! Database schema definitions
//!
//! The archive and the frontier may live in the same SQLite file or in two
//! separate ones; their tables do not overlap.

use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// SQL schema for the archive of accepted accounts and posts
pub const ARCHIVE_SCHEMA_SQL: &str = r#"
-- Accepted accounts, keyed by the remote numeric ID
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY,
    handle TEXT NOT NULL,
    protected INTEGER NOT NULL DEFAULT 0,
    raw TEXT NOT NULL,
    fetched_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_accounts_handle ON accounts(handle);

-- Posts of accepted accounts, keyed by the remote post ID
CREATE TABLE IF NOT EXISTS posts (
    id TEXT PRIMARY KEY,
    account_id INTEGER NOT NULL,
    text TEXT NOT NULL,
    raw TEXT NOT NULL,
    fetched_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_posts_account ON posts(account_id);
"#;

/// SQL schema for the frontier and confirmed sets
pub const FRONTIER_SCHEMA_SQL: &str = r#"
-- Candidates awaiting a visit
CREATE TABLE IF NOT EXISTS frontier (
    set_name TEXT NOT NULL,
    candidate TEXT NOT NULL,
    added_at TEXT NOT NULL,
    PRIMARY KEY (set_name, candidate)
);

-- Handles that passed the language gate, used for re-seeding
CREATE TABLE IF NOT EXISTS confirmed (
    set_name TEXT NOT NULL,
    account_id INTEGER NOT NULL,
    handle TEXT NOT NULL,
    confirmed_at TEXT NOT NULL,
    PRIMARY KEY (set_name, account_id)
);
"#;

/// Opens a database file with the pragmas shared by both stores
///
/// A busy timeout is set because the archive and the frontier may point at
/// the same file through two connections.
pub fn open_connection(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA temp_store = MEMORY;
    ",
    )?;
    conn.busy_timeout(Duration::from_secs(5))?;

    Ok(conn)
}

/// Initializes the archive schema
pub fn initialize_archive_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(ARCHIVE_SCHEMA_SQL)
}

/// Initializes the frontier schema
pub fn initialize_frontier_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(FRONTIER_SCHEMA_SQL)
}
