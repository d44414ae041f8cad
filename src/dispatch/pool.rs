//! Bounded dispatcher for dose jobs.
//!
//! Submissions go into a fixed-capacity queue. A single dispatcher task
//! drains it, waiting for one of `max_concurrent_jobs` permits before it
//! spawns each job, so at most that many jobs sleep or report at once.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::config::WorkerConfig;
use crate::dispatch::job::DoseJob;
use crate::dispatch::reporter::DoseReporter;
use crate::dispatch::stats::{DispatchStats, StatsSnapshot};
use crate::dose::DoseRequest;
use crate::observability::metrics;

/// Reasons a job could not be queued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("dose job queue is full ({capacity} jobs waiting)")]
    QueueFull { capacity: usize },

    #[error("dose job dispatcher has stopped")]
    Closed,
}

/// Handle used by request handlers to submit jobs.
#[derive(Debug, Clone)]
pub struct JobDispatcher {
    tx: mpsc::Sender<DoseJob>,
    stats: Arc<DispatchStats>,
    capacity: usize,
}

impl JobDispatcher {
    /// Spawn the dispatcher task on the current runtime.
    pub fn start(config: &WorkerConfig, reporter: DoseReporter) -> Self {
        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let stats = Arc::new(DispatchStats::default());

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let dispatcher_loop = DispatcherLoop {
            rx,
            permits: Arc::new(Semaphore::new(config.max_concurrent_jobs)),
            reporter: Arc::new(reporter),
            stats: stats.clone(),
            rng,
        };
        tokio::spawn(dispatcher_loop.run());

        tracing::info!(
            max_concurrent_jobs = config.max_concurrent_jobs,
            queue_capacity = config.queue_capacity,
            seeded = config.rng_seed.is_some(),
            "Dose job dispatcher started"
        );

        Self {
            tx,
            stats,
            capacity: config.queue_capacity,
        }
    }

    /// Queue a job without waiting. Fails immediately when the queue is full.
    pub fn try_submit(&self, request: DoseRequest) -> Result<Uuid, DispatchError> {
        let job = DoseJob::new(request);
        let job_id = job.id();

        self.stats.begin();
        match self.tx.try_send(job) {
            Ok(()) => {
                self.stats.record_accepted();
                metrics::record_job_accepted();
                metrics::job_started();
                tracing::debug!(
                    job_id = %job_id,
                    medicine_id = request.medicine_id,
                    "Dose job queued"
                );
                Ok(job_id)
            }
            Err(TrySendError::Full(_)) => {
                self.stats.record_rejected();
                metrics::record_job_rejected();
                tracing::warn!(
                    medicine_id = request.medicine_id,
                    capacity = self.capacity,
                    "Dose job queue full, rejecting request"
                );
                Err(DispatchError::QueueFull {
                    capacity: self.capacity,
                })
            }
            Err(TrySendError::Closed(_)) => {
                self.stats.record_rejected();
                Err(DispatchError::Closed)
            }
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

struct DispatcherLoop {
    rx: mpsc::Receiver<DoseJob>,
    permits: Arc<Semaphore>,
    reporter: Arc<DoseReporter>,
    stats: Arc<DispatchStats>,
    rng: StdRng,
}

impl DispatcherLoop {
    async fn run(mut self) {
        loop {
            // Permit first, so a waiting job stays in the queue and counts
            // against its capacity.
            let permit = match self.permits.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };
            let Some(job) = self.rx.recv().await else {
                break;
            };

            let rng = derive_job_rng(&mut self.rng);
            let reporter = self.reporter.clone();
            let stats = self.stats.clone();

            tokio::spawn(async move {
                let _permit = permit;
                let outcome = job.execute(rng, &reporter).await;
                stats.record_finished(&outcome);
                metrics::job_finished();
            });
        }

        tracing::debug!("Dose job queue closed, dispatcher exiting");
    }
}

/// Seed a job's generator from the dispatcher's, in submission order.
fn derive_job_rng(master: &mut StdRng) -> StdRng {
    StdRng::seed_from_u64(master.next_u64())
}
