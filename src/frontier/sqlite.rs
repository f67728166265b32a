//! Durable frontier backed by SQLite
//!
//! Several named sets can share one file; each instance works on the set it
//! was opened with.

use crate::frontier::traits::{Frontier, FrontierResult};
use crate::models::Candidate;
use crate::storage::schema::{initialize_frontier_schema, open_connection};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite frontier backend
pub struct SqliteFrontier {
    conn: Mutex<Connection>,
    set_name: String,
}

impl SqliteFrontier {
    /// Opens or creates the frontier database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    /// * `set_name` - Name of the set this instance works on
    pub fn new(path: &Path, set_name: &str) -> FrontierResult<Self> {
        let conn = open_connection(path)?;
        initialize_frontier_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            set_name: set_name.to_string(),
        })
    }

    /// Creates an in-memory frontier
    pub fn open_in_memory(set_name: &str) -> FrontierResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_frontier_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            set_name: set_name.to_string(),
        })
    }

    /// Name of the set this instance works on
    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Frontier for SqliteFrontier {
    // ===== Frontier Set =====

    fn draw(&self) -> FrontierResult<Option<Candidate>> {
        let conn = self.conn();

        loop {
            // Pick and delete in one statement so the draw is atomic
            let key: Option<String> = conn
                .query_row(
                    "DELETE FROM frontier
                     WHERE set_name = ?1 AND candidate = (
                         SELECT candidate FROM frontier WHERE set_name = ?1
                         ORDER BY RANDOM() LIMIT 1
                     )
                     RETURNING candidate",
                    params![self.set_name],
                    |row| row.get(0),
                )
                .optional()?;

            let Some(key) = key else {
                return Ok(None);
            };

            match key.parse::<Candidate>() {
                Ok(candidate) => return Ok(Some(candidate)),
                Err(e) => {
                    tracing::warn!("Dropping unreadable frontier entry '{}': {}", key, e);
                }
            }
        }
    }

    fn offer(&self, candidate: &Candidate) -> FrontierResult<bool> {
        let now = Utc::now().to_rfc3339();
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO frontier (set_name, candidate, added_at) VALUES (?1, ?2, ?3)",
            params![self.set_name, candidate.key(), now],
        )?;
        Ok(changed > 0)
    }

    fn contains(&self, candidate: &Candidate) -> FrontierResult<bool> {
        let found: Option<i64> = self
            .conn()
            .query_row(
                "SELECT 1 FROM frontier WHERE set_name = ?1 AND candidate = ?2",
                params![self.set_name, candidate.key()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn len(&self) -> FrontierResult<usize> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM frontier WHERE set_name = ?1",
            params![self.set_name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ===== Confirmed Set =====

    fn confirm(&self, account_id: u64, handle: &str) -> FrontierResult<bool> {
        let conn = self.conn();
        let now = Utc::now().to_rfc3339();
        let changed = conn.execute(
            "INSERT OR IGNORE INTO confirmed (set_name, account_id, handle, confirmed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![self.set_name, account_id as i64, handle, now],
        )?;
        if changed == 0 {
            conn.execute(
                "UPDATE confirmed SET handle = ?3 WHERE set_name = ?1 AND account_id = ?2",
                params![self.set_name, account_id as i64, handle],
            )?;
        }
        Ok(changed > 0)
    }

    fn confirmed_len(&self) -> FrontierResult<usize> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM confirmed WHERE set_name = ?1",
            params![self.set_name],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn sample_confirmed(&self, limit: usize) -> FrontierResult<Vec<Candidate>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT account_id FROM confirmed WHERE set_name = ?1 ORDER BY RANDOM() LIMIT ?2",
        )?;

        let ids = stmt
            .query_map(params![self.set_name, limit as i64], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<i64>, _>>()?;

        Ok(ids.into_iter().map(|id| Candidate::Id(id as u64)).collect())
    }
}
