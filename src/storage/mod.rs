//! Storage module for the archive of accepted accounts
//!
//! This module handles all database operations for accepted data, including:
//! - SQLite database initialization and schema management
//! - Idempotent account and post inserts
//! - Counts used for progress reporting

pub(crate) mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteArchive;
pub use traits::{Archive, StorageError, StorageResult};

use std::path::Path;

/// Opens or creates the archive database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_archive(path: &Path) -> StorageResult<SqliteArchive> {
    SqliteArchive::new(path)
}

/// Result of a single-row insert
///
/// A duplicate key is an expected steady-state condition when the crawl
/// rediscovers an account, so it is a value rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Inserted,
    AlreadyExists,
}

impl WriteOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// Result of a batch insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub inserted: usize,
    pub duplicates: usize,
}

/// Represents an archived account
#[derive(Debug, Clone)]
pub struct StoredAccount {
    pub id: u64,
    pub handle: String,
    pub protected: bool,
    pub raw: serde_json::Value,
    pub fetched_at: String,
}
