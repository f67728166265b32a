//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CandidateState`: Lifecycle of a single candidate visit (drawn, fetching, classifying, ...)
//! - `BackoffGate`: Crawl-wide cooldown entered when the remote API rate limits us

mod backoff;
mod candidate_state;

// Re-export main types
pub use backoff::BackoffGate;
pub use candidate_state::CandidateState;
