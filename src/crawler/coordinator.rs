//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the other components together:
//! - Drawing candidates from the frontier
//! - Fetching profiles, timelines and follower lists through the backoff gate
//! - Running the language gate and committing accepted accounts
//! - Sampling followers back into the frontier
//! - Driving passes forever and recovering from failed passes

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::AccountApi;
use crate::frontier::{reseed_from_confirmed, Frontier};
use crate::language::{LanguageGate, LanguageVerdict};
use crate::models::{AccountRecord, Candidate};
use crate::output::{load_statistics, log_statistics, PassReport};
use crate::state::{BackoffGate, CandidateState};
use crate::storage::{Archive, BatchOutcome, WriteOutcome};
use crate::{FetchError, FetchResult, ScoutError};
use rand::seq::SliceRandom;
use std::convert::Infallible;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often workers log progress, in processed candidates
const PROGRESS_INTERVAL: usize = 10;

/// How long an idle worker waits for busy workers to offer followers
const EMPTY_FRONTIER_WAIT: Duration = Duration::from_millis(250);

/// Why a candidate was turned away
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// The account hides its posts
    Protected,

    /// The timeline came back empty
    NoPosts,

    /// Too few posts in the target language
    Language(LanguageVerdict),
}

/// What happened to an accepted account's followers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Followers were fetched and a sample offered to the frontier
    Completed {
        followers: usize,
        sampled: usize,
        offered: usize,
    },

    /// The follower fetch was rate limited; the account stays committed
    RateLimited,

    /// The follower fetch failed for another reason
    Failed,
}

/// Result of processing one drawn candidate
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Accepted {
        verdict: LanguageVerdict,
        account: WriteOutcome,
        posts: BatchOutcome,
        expansion: Expansion,
    },

    Rejected(RejectReason),

    /// Rate limited before the account could be judged; the candidate is dropped
    RateLimited,

    /// Profile or timeline could not be fetched
    Errored(String),
}

/// Tracks one candidate through its lifecycle states
struct Visit<'a> {
    candidate: &'a Candidate,
    state: CandidateState,
}

impl<'a> Visit<'a> {
    fn new(candidate: &'a Candidate) -> Self {
        Self {
            candidate,
            state: CandidateState::Drawn,
        }
    }

    fn advance(&mut self, next: CandidateState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {}",
            self.state,
            next
        );
        tracing::debug!("{}: {} -> {}", self.candidate, self.state, next);
        self.state = next;
    }

    fn reject(mut self, reason: RejectReason) -> CandidateOutcome {
        self.advance(CandidateState::Rejected);
        CandidateOutcome::Rejected(reason)
    }

    /// Maps a failed profile or timeline fetch to an outcome
    fn fetch_failed(mut self, error: FetchError) -> CandidateOutcome {
        self.advance(CandidateState::Errored);
        match error {
            FetchError::RateLimited => {
                tracing::info!("Dropping {} after rate limit", self.candidate);
                CandidateOutcome::RateLimited
            }
            FetchError::NotFound(_) => {
                tracing::debug!("{} no longer exists", self.candidate);
                CandidateOutcome::Errored(error.to_string())
            }
            FetchError::Remote(message) => {
                tracing::warn!("Failed to fetch {}: {}", self.candidate, message);
                CandidateOutcome::Errored(message)
            }
        }
    }
}

/// Picks up to `cap` follower IDs uniformly at random
///
/// Returns all of them, shuffled, when there are fewer than `cap`.
pub fn sample_followers(mut ids: Vec<u64>, cap: usize) -> Vec<u64> {
    ids.shuffle(&mut rand::rng());
    ids.truncate(cap);
    ids
}

/// Main crawler coordinator structure
///
/// Collaborators are built once by the caller and shared through `Arc`s so
/// the same frontier and archive can be inspected from outside while a crawl
/// runs.
pub struct Coordinator<A, F, S> {
    api: Arc<A>,
    frontier: Arc<F>,
    archive: Arc<S>,
    gate: LanguageGate,
    backoff: Arc<BackoffGate>,
    settings: CrawlerConfig,
}

impl<A, F, S> Coordinator<A, F, S>
where
    A: AccountApi + 'static,
    F: Frontier + 'static,
    S: Archive + 'static,
{
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `api` - Remote account API
    /// * `frontier` - Candidates still to visit
    /// * `archive` - Durable store for accepted accounts and their posts
    /// * `gate` - Language filter applied to each timeline
    /// * `settings` - Crawl tuning (cooldown, sample size, pass size, workers)
    pub fn new(
        api: Arc<A>,
        frontier: Arc<F>,
        archive: Arc<S>,
        gate: LanguageGate,
        settings: CrawlerConfig,
    ) -> Self {
        let backoff = Arc::new(BackoffGate::new(settings.cooldown()));

        Self {
            api,
            frontier,
            archive,
            gate,
            backoff,
            settings,
        }
    }

    /// The crawl-wide cooldown shared by all workers
    pub fn backoff(&self) -> &BackoffGate {
        &self.backoff
    }

    /// Runs one remote call behind the backoff gate
    ///
    /// The call is not polled until any running cooldown has passed. A call
    /// that reports rate limiting starts a new cooldown.
    async fn remote<T>(&self, call: impl Future<Output = FetchResult<T>>) -> FetchResult<T> {
        self.backoff.wait_ready().await;

        let result = call.await;
        if result.as_ref().is_err_and(|e| e.is_rate_limited()) {
            self.backoff.trip();
            tracing::warn!(
                "Rate limited, pausing all requests for {}s",
                self.backoff.cooldown().as_secs()
            );
        }

        result
    }

    /// Processes a single drawn candidate
    ///
    /// This method:
    /// 1. Fetches the profile and rejects protected accounts
    /// 2. Fetches the timeline and rejects empty ones
    /// 3. Runs the language gate
    /// 4. Commits accepted accounts and their posts
    /// 5. Offers a sample of the account's followers to the frontier
    ///
    /// Remote failures only affect this candidate and are folded into the
    /// outcome. Store and frontier failures are returned as errors and end
    /// the pass.
    pub async fn process_candidate(
        &self,
        candidate: &Candidate,
    ) -> Result<CandidateOutcome, ScoutError> {
        let mut visit = Visit::new(candidate);
        visit.advance(CandidateState::Fetching);

        let account = match self.remote(self.api.fetch_profile(candidate)).await {
            Ok(account) => account,
            Err(e) => return Ok(visit.fetch_failed(e)),
        };

        if account.protected {
            tracing::info!("Skipping protected account {}", account.handle);
            return Ok(visit.reject(RejectReason::Protected));
        }

        let limit = self.settings.timeline_limit;
        let posts = match self
            .remote(self.api.fetch_timeline(candidate, limit))
            .await
        {
            Ok(posts) => posts,
            Err(e) => return Ok(visit.fetch_failed(e)),
        };

        tracing::info!("Got {} posts from {}", posts.len(), account.handle);

        if posts.is_empty() {
            return Ok(visit.reject(RejectReason::NoPosts));
        }

        visit.advance(CandidateState::Classifying);
        let verdict = self.gate.evaluate(&posts);

        if !verdict.accepted {
            tracing::info!(
                "Rejected {} ({}/{} posts in {}, ratio {:.2} not above {:.2})",
                account.handle,
                verdict.matching,
                verdict.total,
                self.gate.target(),
                verdict.ratio,
                self.gate.threshold()
            );
            return Ok(visit.reject(RejectReason::Language(verdict)));
        }

        visit.advance(CandidateState::Accepted);
        tracing::info!(
            "Accepted {} ({}/{} posts in {}, ratio {:.2})",
            account.handle,
            verdict.matching,
            verdict.total,
            self.gate.target(),
            verdict.ratio
        );

        let account_outcome = self.archive.insert_account(&account)?;
        if account_outcome == WriteOutcome::AlreadyExists {
            tracing::debug!("Account {} was already archived", account.handle);
        }

        let posts_outcome = self.archive.insert_posts(account.id, &posts)?;
        if posts_outcome.duplicates > 0 {
            tracing::debug!(
                "{} of {} posts from {} were already archived",
                posts_outcome.duplicates,
                posts.len(),
                account.handle
            );
        }

        self.frontier.confirm(account.id, &account.handle)?;

        let expansion = self.expand(&account).await?;

        Ok(CandidateOutcome::Accepted {
            verdict,
            account: account_outcome,
            posts: posts_outcome,
            expansion,
        })
    }

    /// Offers a random sample of an accepted account's followers
    async fn expand(&self, account: &AccountRecord) -> Result<Expansion, ScoutError> {
        let subject = Candidate::Id(account.id);

        let ids = match self.remote(self.api.fetch_follower_ids(&subject)).await {
            Ok(ids) => ids,
            Err(FetchError::RateLimited) => {
                tracing::info!("Skipping follower expansion of {}", account.handle);
                return Ok(Expansion::RateLimited);
            }
            Err(e) => {
                tracing::warn!("Failed to fetch followers of {}: {}", account.handle, e);
                return Ok(Expansion::Failed);
            }
        };

        let followers = ids.len();
        let sample = sample_followers(ids, self.settings.sample_size);

        let mut offered = 0;
        for id in &sample {
            if self.frontier.offer(&Candidate::Id(*id))? {
                offered += 1;
            }
        }

        tracing::info!(
            "Got {} followers of {}, offered {} of {} sampled",
            followers,
            account.handle,
            offered,
            sample.len()
        );

        Ok(Expansion::Completed {
            followers,
            sampled: sample.len(),
            offered,
        })
    }

    /// Draws and processes candidates until the frontier or the budget runs out
    ///
    /// `busy` counts workers between a draw and the end of processing. A
    /// worker that finds the frontier empty keeps waiting while any other
    /// worker is busy, since that worker may still offer followers.
    async fn worker(
        &self,
        worker_id: usize,
        budget: &AtomicUsize,
        busy: &AtomicUsize,
        processed: &AtomicUsize,
        started: Instant,
    ) -> Result<PassReport, ScoutError> {
        let mut report = PassReport::default();

        loop {
            if budget
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_err()
            {
                break;
            }

            busy.fetch_add(1, Ordering::SeqCst);
            let candidate = match self.frontier.draw() {
                Ok(Some(candidate)) => candidate,
                Ok(None) => {
                    budget.fetch_add(1, Ordering::SeqCst);
                    if busy.fetch_sub(1, Ordering::SeqCst) == 1 {
                        tracing::debug!("Worker {} found the frontier empty", worker_id);
                        break;
                    }
                    tokio::time::sleep(EMPTY_FRONTIER_WAIT).await;
                    continue;
                }
                Err(e) => {
                    busy.fetch_sub(1, Ordering::SeqCst);
                    return Err(e.into());
                }
            };

            report.drawn += 1;
            let outcome = self.process_candidate(&candidate).await;
            busy.fetch_sub(1, Ordering::SeqCst);
            report.record(&outcome?);

            let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_INTERVAL == 0 {
                let rate = done as f64 / started.elapsed().as_secs_f64().max(f64::EPSILON);
                let pending = self.frontier.len()?;
                tracing::info!(
                    "Progress: {} candidates processed, {} in frontier, {:.2} candidates/sec",
                    done,
                    pending,
                    rate
                );
            }
        }

        Ok(report)
    }

    /// Runs one pass with the configured number of workers
    ///
    /// # Returns
    ///
    /// * `Ok(PassReport)` - Counters merged across all workers
    /// * `Err(ScoutError)` - A store or frontier failure aborted the pass
    pub async fn run_pass(&self) -> Result<PassReport, ScoutError> {
        let budget = AtomicUsize::new(self.settings.pass_size);
        let busy = AtomicUsize::new(0);
        let processed = AtomicUsize::new(0);
        let started = Instant::now();

        let pending = self.frontier.len()?;
        tracing::info!(
            "Starting pass: {} in frontier, {} worker(s), budget {}",
            pending,
            self.settings.workers,
            self.settings.pass_size
        );

        let workers = (0..self.settings.workers.max(1))
            .map(|id| self.worker(id, &budget, &busy, &processed, started));
        let reports = futures::future::try_join_all(workers).await?;

        let mut report = PassReport::default();
        for worker_report in &reports {
            report.merge(worker_report);
        }

        Ok(report)
    }

    /// Refills an empty frontier from previously accepted accounts
    ///
    /// Sleeps the idle interval when there is nothing to refill from.
    async fn refill(&self) -> Result<(), ScoutError> {
        if !self.frontier.is_empty()? {
            return Ok(());
        }

        let added = reseed_from_confirmed(self.frontier.as_ref(), self.settings.pass_size)?;
        if added > 0 {
            tracing::info!("Frontier empty, re-seeded {} confirmed accounts", added);
        } else {
            tracing::info!(
                "Nothing to crawl, sleeping {}s",
                self.settings.idle().as_secs()
            );
            tokio::time::sleep(self.settings.idle()).await;
        }

        Ok(())
    }

    /// Runs one pass in its own task and handles whatever it leaves behind
    ///
    /// A pass that fails or panics is logged and followed by a full cooldown.
    /// Returns the report of a pass that completed.
    pub async fn run_cycle(self: &Arc<Self>) -> Option<PassReport> {
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.run_pass().await });

        let failure = match handle.await {
            Ok(Ok(report)) => {
                report.log();
                match load_statistics(self.archive.as_ref(), self.frontier.as_ref()) {
                    Ok(stats) => log_statistics(&stats),
                    Err(e) => tracing::warn!("Failed to load statistics: {}", e),
                }

                match self.refill().await {
                    Ok(()) => return Some(report),
                    Err(e) => e,
                }
            }
            Ok(Err(e)) => e,
            Err(e) => ScoutError::Task(e.to_string()),
        };

        tracing::error!(
            "Crawl pass failed: {}; resuming in {}s",
            failure,
            self.settings.cooldown().as_secs()
        );
        tokio::time::sleep(self.settings.cooldown()).await;
        None
    }

    /// Runs passes forever
    pub async fn run_forever(self: Arc<Self>) -> Infallible {
        let mut passes: u64 = 0;
        loop {
            passes += 1;
            tracing::debug!("Pass {} starting", passes);
            self.run_cycle().await;
        }
    }
}
