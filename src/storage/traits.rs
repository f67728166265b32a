//! Storage traits and error types
//!
//! This module defines the trait interface for the archive of accepted
//! accounts and their posts, and associated error types.

use crate::models::{AccountRecord, Post};
use crate::storage::{BatchOutcome, StoredAccount, WriteOutcome};
use thiserror::Error;

/// Errors that can occur during storage operations
///
/// Duplicate keys are not errors; they are reported through
/// [`WriteOutcome::AlreadyExists`] and [`BatchOutcome::duplicates`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for the durable archive of accepted accounts and posts
///
/// Implementations are shared between crawl workers and must do their own
/// locking. The archive is the only place where duplicate accounts are
/// detected.
pub trait Archive: Send + Sync {
    // ===== Accounts =====

    /// Stores an accepted account
    ///
    /// # Returns
    ///
    /// * `WriteOutcome::Inserted` - The account was new
    /// * `WriteOutcome::AlreadyExists` - An account with this ID is already archived
    fn insert_account(&self, account: &AccountRecord) -> StorageResult<WriteOutcome>;

    /// Gets an archived account by numeric ID
    fn get_account(&self, account_id: u64) -> StorageResult<Option<StoredAccount>>;

    /// Checks whether an account is archived
    fn has_account(&self, account_id: u64) -> StorageResult<bool>;

    // ===== Posts =====

    /// Stores a batch of posts for one account
    ///
    /// Posts already present are skipped without failing the rest of the batch.
    fn insert_posts(&self, account_id: u64, posts: &[Post]) -> StorageResult<BatchOutcome>;

    /// Counts archived posts for one account
    fn count_posts_for(&self, account_id: u64) -> StorageResult<u64>;

    // ===== Statistics =====

    /// Gets total account count
    fn count_accounts(&self) -> StorageResult<u64>;

    /// Gets total post count
    fn count_posts(&self) -> StorageResult<u64>;
}
