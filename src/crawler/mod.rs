//! Crawler module for account fetching and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - The remote account API and its HTTP client
//! - Bearer token acquisition
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod token;

pub use coordinator::{sample_followers, CandidateOutcome, Coordinator, Expansion, RejectReason};
pub use fetcher::{build_http_client, AccountApi, ApiClient};
pub use token::TokenSource;

use crate::config::Config;
use crate::frontier::{load_seeds, seed_frontier, SqliteFrontier};
use crate::language::{LanguageGate, ScriptClassifier};
use crate::storage::open_archive;
use crate::{ConfigError, FetchError, ScoutError};
use std::convert::Infallible;
use std::sync::Arc;

/// Runs the crawl until the process is stopped
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the archive and frontier stores
/// 2. Seed the frontier if it is empty
/// 3. Build the API client and language gate
/// 4. Run passes forever
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// Only returns on a startup failure.
pub async fn crawl(config: Config) -> Result<Infallible, ScoutError> {
    let archive = Arc::new(open_archive(&config.storage.database_path)?);
    let frontier = Arc::new(SqliteFrontier::new(
        &config.storage.frontier_path,
        &config.storage.frontier_name,
    )?);

    let seeds = load_seeds(&config.seeds)?;
    tracing::info!("Loaded {} seed candidates", seeds.len());
    seed_frontier(frontier.as_ref(), &seeds)?;

    let classifier = ScriptClassifier::new(config.crawler.script_share).map_err(|e| {
        ConfigError::Validation(format!("Failed to build script classifier: {}", e))
    })?;
    let gate = LanguageGate::new(
        Arc::new(classifier),
        &config.crawler.target_language,
        config.crawler.threshold,
    );

    let api = ApiClient::new(&config.api)
        .map_err(|e| FetchError::Remote(format!("Failed to build HTTP client: {}", e)))?;

    let coordinator = Arc::new(Coordinator::new(
        Arc::new(api),
        frontier,
        archive,
        gate,
        config.crawler,
    ));

    Ok(coordinator.run_forever().await)
}
