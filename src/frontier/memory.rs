use crate::frontier::traits::{Frontier, FrontierResult};
use crate::models::Candidate;
use rand::seq::IteratorRandom;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

/// In-process frontier for ephemeral runs and tests
///
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryFrontier {
    inner: Mutex<Sets>,
}

#[derive(Debug, Default)]
struct Sets {
    frontier: HashSet<Candidate>,
    confirmed: HashMap<u64, String>,
}

impl MemoryFrontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding the given candidates
    pub fn with_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Candidate>,
    {
        Self {
            inner: Mutex::new(Sets {
                frontier: candidates.into_iter().collect(),
                confirmed: HashMap::new(),
            }),
        }
    }

    /// Returns a copy of the current members
    pub fn snapshot(&self) -> Vec<Candidate> {
        self.lock().frontier.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Sets> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Frontier for MemoryFrontier {
    fn draw(&self) -> FrontierResult<Option<Candidate>> {
        let mut sets = self.lock();
        let picked = sets.frontier.iter().choose(&mut rand::rng()).cloned();
        if let Some(candidate) = &picked {
            sets.frontier.remove(candidate);
        }
        Ok(picked)
    }

    fn offer(&self, candidate: &Candidate) -> FrontierResult<bool> {
        Ok(self.lock().frontier.insert(candidate.clone()))
    }

    fn contains(&self, candidate: &Candidate) -> FrontierResult<bool> {
        Ok(self.lock().frontier.contains(candidate))
    }

    fn len(&self) -> FrontierResult<usize> {
        Ok(self.lock().frontier.len())
    }

    fn confirm(&self, account_id: u64, handle: &str) -> FrontierResult<bool> {
        let previous = self
            .lock()
            .confirmed
            .insert(account_id, handle.to_string());
        Ok(previous.is_none())
    }

    fn confirmed_len(&self) -> FrontierResult<usize> {
        Ok(self.lock().confirmed.len())
    }

    fn sample_confirmed(&self, limit: usize) -> FrontierResult<Vec<Candidate>> {
        let sets = self.lock();
        Ok(sets
            .confirmed
            .keys()
            .map(|&id| Candidate::Id(id))
            .choose_multiple(&mut rand::rng(), limit))
    }
}
