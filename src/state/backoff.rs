use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Crawl-wide cooldown shared by every worker
///
/// Once any remote call reports rate limiting, the gate is tripped and every
/// subsequent call waits in [`BackoffGate::wait_ready`] until the deadline has
/// passed. Waiting is a timer sleep; nothing polls.
#[derive(Debug)]
pub struct BackoffGate {
    /// How long a single trip blocks remote calls
    cooldown: Duration,

    /// Calls may resume at this instant
    until: Mutex<Option<Instant>>,

    /// Number of times the gate was tripped since startup
    trips: AtomicU64,
}

impl BackoffGate {
    /// Creates an open gate with the given cooldown
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            until: Mutex::new(None),
            trips: AtomicU64::new(0),
        }
    }

    /// Returns the configured cooldown
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Starts a cooldown from now
    ///
    /// A trip never shortens a cooldown that is already running.
    ///
    /// # Returns
    ///
    /// The instant at which remote calls may resume
    pub fn trip(&self) -> Instant {
        let deadline = Instant::now() + self.cooldown;
        let mut until = self.lock();
        let effective = match *until {
            Some(existing) if existing > deadline => existing,
            _ => deadline,
        };
        *until = Some(effective);
        self.trips.fetch_add(1, Ordering::Relaxed);
        effective
    }

    /// Time left until remote calls may resume, if cooling down
    pub fn remaining(&self) -> Option<Duration> {
        let until = self.lock();
        until.and_then(|deadline| {
            let now = Instant::now();
            (deadline > now).then(|| deadline - now)
        })
    }

    /// Returns true while a cooldown is running
    pub fn is_cooling_down(&self) -> bool {
        self.remaining().is_some()
    }

    /// Number of trips since the gate was created
    pub fn trip_count(&self) -> u64 {
        self.trips.load(Ordering::Relaxed)
    }

    /// Waits until no cooldown is running
    ///
    /// Re-checks after each sleep because another worker may have extended
    /// the deadline in the meantime.
    pub async fn wait_ready(&self) {
        loop {
            let deadline = {
                let until = self.lock();
                match *until {
                    Some(deadline) if deadline > Instant::now() => deadline,
                    _ => return,
                }
            };

            tracing::trace!(
                "Waiting {:?} for cooldown",
                deadline.saturating_duration_since(Instant::now())
            );
            tokio::time::sleep_until(deadline).await;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        // The guarded value is a plain deadline, so a poisoned lock is still usable
        self.until.lock().unwrap_or_else(|e| e.into_inner())
    }
}
