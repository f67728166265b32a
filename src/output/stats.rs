//! Statistics generation from the archive and frontier
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::frontier::Frontier;
use crate::storage::Archive;
use crate::ScoutError;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Accepted accounts in the archive
    pub accounts: u64,

    /// Posts in the archive
    pub posts: u64,

    /// Candidates waiting in the frontier
    pub frontier: usize,

    /// Handles in the confirmed set
    pub confirmed: usize,
}

impl CrawlStatistics {
    /// Average number of archived posts per archived account
    pub fn posts_per_account(&self) -> f64 {
        if self.accounts == 0 {
            0.0
        } else {
            self.posts as f64 / self.accounts as f64
        }
    }
}

/// Loads statistics from the archive and frontier
///
/// # Arguments
///
/// * `archive` - The durable store to count
/// * `frontier` - The frontier to measure
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(ScoutError)` - Failed to query one of the stores
pub fn load_statistics(
    archive: &dyn Archive,
    frontier: &dyn Frontier,
) -> Result<CrawlStatistics, ScoutError> {
    Ok(CrawlStatistics {
        accounts: archive.count_accounts()?,
        posts: archive.count_posts()?,
        frontier: frontier.len()?,
        confirmed: frontier.confirmed_len()?,
    })
}

/// Logs statistics at info level, one line per crawl
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!(
        "Archive: {} accounts, {} posts ({:.1} per account); frontier: {} pending, {} confirmed",
        stats.accounts,
        stats.posts,
        stats.posts_per_account(),
        stats.frontier,
        stats.confirmed
    );
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Archive:");
    println!("  Accounts: {}", stats.accounts);
    println!("  Posts: {}", stats.posts);
    println!("  Posts per account: {:.1}", stats.posts_per_account());
    println!();

    println!("Frontier:");
    println!("  Pending candidates: {}", stats.frontier);
    println!("  Confirmed accounts: {}", stats.confirmed);
}
