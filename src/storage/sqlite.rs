//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Archive trait.

use crate::models::{AccountRecord, Post};
use crate::storage::schema::{initialize_archive_schema, open_connection};
use crate::storage::traits::{Archive, StorageResult};
use crate::storage::{BatchOutcome, StoredAccount, WriteOutcome};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite archive backend
///
/// The connection sits behind a mutex so one archive can be shared by all
/// crawl workers.
pub struct SqliteArchive {
    conn: Mutex<Connection>,
}

impl SqliteArchive {
    /// Opens or creates the archive database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = open_connection(path)?;
        initialize_archive_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory archive
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_archive_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves nothing half-applied that SQLite has not rolled back
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Archive for SqliteArchive {
    // ===== Accounts =====

    fn insert_account(&self, account: &AccountRecord) -> StorageResult<WriteOutcome> {
        let raw = serde_json::to_string(&account.raw)?;
        let now = Utc::now().to_rfc3339();

        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO accounts (id, handle, protected, raw, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                account.id as i64,
                account.handle,
                account.protected,
                raw,
                now
            ],
        )?;

        Ok(if changed == 0 {
            WriteOutcome::AlreadyExists
        } else {
            WriteOutcome::Inserted
        })
    }

    fn get_account(&self, account_id: u64) -> StorageResult<Option<StoredAccount>> {
        let conn = self.conn();
        let row = conn
            .query_row(
                "SELECT id, handle, protected, raw, fetched_at FROM accounts WHERE id = ?1",
                params![account_id as i64],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, bool>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((id, handle, protected, raw, fetched_at)) => Ok(Some(StoredAccount {
                id: id as u64,
                handle,
                protected,
                raw: serde_json::from_str(&raw)?,
                fetched_at,
            })),
        }
    }

    fn has_account(&self, account_id: u64) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn()
            .query_row(
                "SELECT 1 FROM accounts WHERE id = ?1",
                params![account_id as i64],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    // ===== Posts =====

    fn insert_posts(&self, account_id: u64, posts: &[Post]) -> StorageResult<BatchOutcome> {
        let now = Utc::now().to_rfc3339();
        let mut outcome = BatchOutcome::default();

        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO posts (id, account_id, text, raw, fetched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for post in posts {
                let raw = serde_json::to_string(&post.raw)?;
                let changed =
                    stmt.execute(params![post.id, account_id as i64, post.text, raw, now])?;
                if changed == 0 {
                    outcome.duplicates += 1;
                } else {
                    outcome.inserted += 1;
                }
            }
        }
        tx.commit()?;

        Ok(outcome)
    }

    fn count_posts_for(&self, account_id: u64) -> StorageResult<u64> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM posts WHERE account_id = ?1",
            params![account_id as i64],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    // ===== Statistics =====

    fn count_accounts(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_posts(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
