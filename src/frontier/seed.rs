//! Cold-start seeding and re-seeding from the confirmed set

use crate::config::SeedConfig;
use crate::frontier::traits::{Frontier, FrontierResult};
use crate::models::Candidate;
use crate::ConfigError;

/// Parses a seed list, one handle per line
///
/// Blank lines and lines starting with `#` are ignored. Lines that are not
/// valid handles are logged and skipped.
pub fn parse_seed_list(content: &str) -> Vec<Candidate> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| match line.parse::<Candidate>() {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                tracing::warn!("Skipping seed line '{}': {}", line, e);
                None
            }
        })
        .collect()
}

/// Collects seeds from the inline list and the seed file
///
/// # Returns
///
/// * `Ok(Vec<Candidate>)` - All seeds, inline ones first, without duplicates
/// * `Err(ConfigError)` - The seed file could not be read
pub fn load_seeds(config: &SeedConfig) -> Result<Vec<Candidate>, ConfigError> {
    let mut seeds = parse_seed_list(&config.handles.join("\n"));

    if let Some(path) = &config.file {
        let content = std::fs::read_to_string(path)?;
        seeds.extend(parse_seed_list(&content));
    }

    let mut seen = std::collections::HashSet::new();
    seeds.retain(|candidate| seen.insert(candidate.clone()));

    Ok(seeds)
}

/// Offers seeds to the frontier if, and only if, it is empty
///
/// A non-empty frontier means an earlier run left work behind, which takes
/// precedence over the seed list.
///
/// # Returns
///
/// The number of seeds that were added
pub fn seed_frontier(frontier: &dyn Frontier, seeds: &[Candidate]) -> FrontierResult<usize> {
    let pending = frontier.len()?;
    if pending > 0 {
        tracing::info!(
            "Frontier already holds {} candidates, skipping seed list",
            pending
        );
        return Ok(0);
    }

    let mut added = 0;
    for seed in seeds {
        if frontier.offer(seed)? {
            added += 1;
        }
    }

    tracing::info!("Seeded frontier with {} candidates", added);
    Ok(added)
}

/// Offers a random sample of confirmed accounts back to the frontier
///
/// Accounts go back by numeric ID, the same key follower expansion uses.
///
/// # Returns
///
/// The number of accounts that were added
pub fn reseed_from_confirmed(frontier: &dyn Frontier, limit: usize) -> FrontierResult<usize> {
    let mut added = 0;
    for candidate in frontier.sample_confirmed(limit)? {
        if frontier.offer(&candidate)? {
            added += 1;
        }
    }
    Ok(added)
}
