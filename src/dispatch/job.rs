//! A single delayed dose calculation.

use rand::Rng;
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::dispatch::reporter::DoseReporter;
use crate::dose::{compute_dose, DoseReport, DoseRequest, DoseValue};
use crate::observability::metrics;

/// Simulated processing time before a dose is computed.
pub const PROCESSING_DELAY: Duration = Duration::from_secs(3);

/// How a job ended. Neither variant is escalated past the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The downstream answered, with any status.
    Reported { value: DoseValue, status: StatusCode },
    /// The PUT never got a response.
    TransportFailed { value: DoseValue },
}

impl JobOutcome {
    pub fn value(&self) -> DoseValue {
        match self {
            JobOutcome::Reported { value, .. } | JobOutcome::TransportFailed { value } => *value,
        }
    }
}

/// A dose request accepted by the handler and waiting to be processed.
#[derive(Debug, Clone)]
pub struct DoseJob {
    id: Uuid,
    request: DoseRequest,
    submitted_at: Instant,
}

impl DoseJob {
    pub fn new(request: DoseRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            submitted_at: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn medicine_id(&self) -> i64 {
        self.request.medicine_id
    }

    /// Wait out the processing delay, then compute and report the dose.
    pub async fn execute<R: Rng>(self, mut rng: R, reporter: &DoseReporter) -> JobOutcome {
        tokio::time::sleep(PROCESSING_DELAY).await;
        self.report(&mut rng, reporter).await
    }

    async fn report<R: Rng>(&self, rng: &mut R, reporter: &DoseReporter) -> JobOutcome {
        let value = compute_dose(rng);
        metrics::record_dose_value(value);

        let report = DoseReport::new(value);
        match reporter.report(self.medicine_id(), &report).await {
            Ok(status) => {
                if status.is_success() {
                    tracing::info!(
                        job_id = %self.id,
                        medicine_id = self.medicine_id(),
                        value = value.get(),
                        status = %status,
                        elapsed_ms = self.submitted_at.elapsed().as_millis() as u64,
                        "Dose reported"
                    );
                } else {
                    tracing::warn!(
                        job_id = %self.id,
                        medicine_id = self.medicine_id(),
                        value = value.get(),
                        status = %status,
                        "Downstream rejected dose report"
                    );
                }
                metrics::record_report("reported");
                JobOutcome::Reported { value, status }
            }
            Err(e) => {
                tracing::error!(
                    job_id = %self.id,
                    medicine_id = self.medicine_id(),
                    value = value.get(),
                    error = %e,
                    "Error sending dose report"
                );
                metrics::record_report("transport_error");
                JobOutcome::TransportFailed { value }
            }
        }
    }
}
