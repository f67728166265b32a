//! Langscout: a follower-graph crawler that archives accounts writing in one language
//!
//! This crate walks outward from a set of seed accounts, samples their followers,
//! keeps the accounts whose recent posts are mostly in the target language, and
//! stores those accounts and posts in SQLite. It is built to run unattended and
//! to ride out upstream rate limiting without losing its frontier.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod language;
pub mod models;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Langscout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Remote API error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Frontier error: {0}")]
    Frontier(#[from] frontier::FrontierError),

    #[error("Crawl task failed: {0}")]
    Task(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for {name}: '{value}'")]
    Invalid { name: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the remote account API
///
/// `RateLimited` is kept apart from everything else because it is the only
/// failure that affects the whole crawl rather than a single candidate.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Rate limited by the remote API")]
    RateLimited,

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Remote(String),
}

impl FetchError {
    /// Returns true if this error should trigger the global cooldown
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}

/// Result type alias for remote API operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Coordinator;
pub use models::{AccountRecord, Candidate, Post};
pub use state::CandidateState;
