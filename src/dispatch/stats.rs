//! Dispatcher counters shared between the handler and running jobs.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dispatch::job::JobOutcome;

/// Live job counters.
#[derive(Debug, Default)]
pub struct DispatchStats {
    accepted: AtomicU64,
    rejected: AtomicU64,
    in_flight: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub accepted: u64,
    pub rejected: u64,
    pub in_flight: u64,
    pub completed: u64,
    pub failed: u64,
}

impl DispatchStats {
    /// Reserve an in-flight slot before the job is queued.
    pub(crate) fn begin(&self) {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
    }

    /// The queue took the job.
    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// The queue refused the job; release the slot taken by `begin`.
    pub(crate) fn record_rejected(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_finished(&self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Reported { .. } => self.completed.fetch_add(1, Ordering::Relaxed),
            JobOutcome::TransportFailed { .. } => self.failed.fetch_add(1, Ordering::Relaxed),
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::SeqCst),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
