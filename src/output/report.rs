use crate::crawler::{CandidateOutcome, Expansion};
use crate::storage::WriteOutcome;

/// Counters collected over one crawl pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    pub drawn: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub errored: usize,
    pub rate_limited: usize,
    pub followers_offered: usize,
    pub accounts_inserted: usize,
    pub posts_inserted: usize,
}

impl PassReport {
    /// Adds one candidate's outcome to the counters
    ///
    /// `drawn` is counted by the caller since it is known before the outcome.
    pub fn record(&mut self, outcome: &CandidateOutcome) {
        match outcome {
            CandidateOutcome::Accepted {
                account,
                posts,
                expansion,
                ..
            } => {
                self.accepted += 1;
                if *account == WriteOutcome::Inserted {
                    self.accounts_inserted += 1;
                }
                self.posts_inserted += posts.inserted;
                match expansion {
                    Expansion::Completed { offered, .. } => self.followers_offered += offered,
                    Expansion::RateLimited => self.rate_limited += 1,
                    Expansion::Failed => {}
                }
            }
            CandidateOutcome::Rejected(_) => self.rejected += 1,
            CandidateOutcome::RateLimited => self.rate_limited += 1,
            CandidateOutcome::Errored(_) => self.errored += 1,
        }
    }

    /// Folds another worker's counters into this report
    pub fn merge(&mut self, other: &PassReport) {
        self.drawn += other.drawn;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.errored += other.errored;
        self.rate_limited += other.rate_limited;
        self.followers_offered += other.followers_offered;
        self.accounts_inserted += other.accounts_inserted;
        self.posts_inserted += other.posts_inserted;
    }

    pub fn log(&self) {
        tracing::info!(
            "Pass complete: {} drawn, {} accepted, {} rejected, {} errored, {} rate limited",
            self.drawn,
            self.accepted,
            self.rejected,
            self.errored,
            self.rate_limited
        );
        tracing::info!(
            "Pass added {} accounts, {} posts, {} followers to the frontier",
            self.accounts_inserted,
            self.posts_inserted,
            self.followers_offered
        );
    }
}
