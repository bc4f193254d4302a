//! Periodic polling with at most one poll in flight
//!
//! Each tick runs its poll on its own task, so a slow poll can still be
//! running when the next tick fires. [`Poller`] guards the in-flight state
//! with an atomic flag: an overlapping tick is skipped and counted, never
//! queued.

use crate::error::{RemoError, Result};
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Result of a single tick
#[derive(Debug)]
pub enum PollOutcome<T> {
    Completed(T),
    Failed(RemoError),
    /// A previous poll was still running
    Skipped,
    Cancelled,
}

/// Counters since the poller was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PollStats {
    pub completed: u64,
    pub failed: u64,
    pub skipped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    completed: AtomicU64,
    failed: AtomicU64,
    skipped: AtomicU64,
}

/// Releases the in-flight flag when dropped, including on cancellation
#[derive(Debug)]
pub struct PollGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for PollGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct Poller {
    interval: Duration,
    in_flight: AtomicBool,
    counters: Counters,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            in_flight: AtomicBool::new(false),
            counters: Counters::default(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_polling(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> PollStats {
        PollStats {
            completed: self.counters.completed.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            skipped: self.counters.skipped.load(Ordering::Relaxed),
        }
    }

    /// Claim the in-flight slot, or `None` if a poll is already running
    pub fn try_begin(&self) -> Option<PollGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PollGuard {
                flag: &self.in_flight,
            })
    }

    /// Run one poll unless another is in flight
    pub async fn tick<F, Fut, T>(&self, poll: F) -> PollOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(_guard) = self.try_begin() else {
            self.counters.skipped.fetch_add(1, Ordering::Relaxed);
            debug!("Previous poll still running, skipping tick");
            return PollOutcome::Skipped;
        };

        match poll().await {
            Ok(value) => {
                self.counters.completed.fetch_add(1, Ordering::Relaxed);
                PollOutcome::Completed(value)
            }
            Err(e) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!("Polling error: {e}");
                PollOutcome::Failed(e)
            }
        }
    }

    /// Like [`tick`](Self::tick), abandoning the poll when `cancel` fires
    pub async fn tick_until_cancelled<F, Fut, T>(
        &self,
        cancel: &CancellationToken,
        poll: F,
    ) -> PollOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        tokio::select! {
            _ = cancel.cancelled() => PollOutcome::Cancelled,
            outcome = self.tick(poll) => outcome,
        }
    }

    /// Tick every interval until `cancel` fires. The first poll happens one
    /// interval after the call.
    pub async fn run<F, Fut>(self: Arc<Self>, cancel: CancellationToken, poll: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let poll = Arc::new(poll);
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let poller = Arc::clone(&self);
                    let poll = Arc::clone(&poll);
                    let cancel = cancel.clone();
                    tokio::spawn(async move {
                        poller.tick_until_cancelled(&cancel, || (*poll)()).await;
                    });
                }
            }
        }
        debug!("Poller stopped");
    }
}
