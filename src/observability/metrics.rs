//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dose_jobs_accepted_total` (counter)
//! - `dose_jobs_rejected_total` (counter): queue full
//! - `dose_reports_total` (counter): by `outcome` (reported, transport_error)
//! - `dose_values_total` (counter): by computed `value`
//! - `dose_jobs_in_flight` (gauge): queued plus running jobs

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

use crate::dose::DoseValue;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_job_accepted() {
    ::metrics::counter!("dose_jobs_accepted_total").increment(1);
}

pub fn record_job_rejected() {
    ::metrics::counter!("dose_jobs_rejected_total").increment(1);
}

pub fn record_report(outcome: &'static str) {
    ::metrics::counter!("dose_reports_total", "outcome" => outcome).increment(1);
}

pub fn record_dose_value(value: DoseValue) {
    ::metrics::counter!("dose_values_total", "value" => value.to_string()).increment(1);
}

pub fn job_started() {
    ::metrics::gauge!("dose_jobs_in_flight").increment(1.0);
}

pub fn job_finished() {
    ::metrics::gauge!("dose_jobs_in_flight").decrement(1.0);
}
