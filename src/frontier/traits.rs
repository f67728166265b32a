//! Frontier traits and error types

use crate::models::Candidate;
use thiserror::Error;

/// Errors that can occur in a frontier store
#[derive(Debug, Error)]
pub enum FrontierError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for frontier operations
pub type FrontierResult<T> = Result<T, FrontierError>;

/// A deduplicating, unordered set of candidates awaiting a visit
///
/// Every method must be atomic with respect to concurrent callers: two
/// workers never draw the same candidate, and concurrent offers of one
/// candidate leave a single member.
///
/// The frontier also keeps the confirmed set, the accounts that passed the
/// language gate, which the crawl falls back on when the frontier runs dry.
/// Confirmed accounts are keyed by numeric ID, so a re-seeded account shares
/// its frontier key with the same account found among someone's followers.
pub trait Frontier: Send + Sync {
    // ===== Frontier Set =====

    /// Removes and returns an arbitrary member
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Candidate))` - A candidate that is no longer in the set
    /// * `Ok(None)` - The set is empty
    fn draw(&self) -> FrontierResult<Option<Candidate>>;

    /// Adds a candidate
    ///
    /// # Returns
    ///
    /// `true` if the candidate was not already a member
    fn offer(&self, candidate: &Candidate) -> FrontierResult<bool>;

    /// Checks membership
    fn contains(&self, candidate: &Candidate) -> FrontierResult<bool>;

    /// Returns the number of members
    fn len(&self) -> FrontierResult<usize>;

    /// Returns whether the set is empty
    fn is_empty(&self) -> FrontierResult<bool> {
        Ok(self.len()? == 0)
    }

    // ===== Confirmed Set =====

    /// Records an account that passed the language gate
    ///
    /// The handle is kept for reference; a later confirm of the same ID
    /// updates it.
    ///
    /// # Returns
    ///
    /// `true` if the account was not already confirmed
    fn confirm(&self, account_id: u64, handle: &str) -> FrontierResult<bool>;

    /// Returns the number of confirmed accounts
    fn confirmed_len(&self) -> FrontierResult<usize>;

    /// Returns up to `limit` confirmed accounts chosen at random, as
    /// `Candidate::Id`
    fn sample_confirmed(&self, limit: usize) -> FrontierResult<Vec<Candidate>>;
}
