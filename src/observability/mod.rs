//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler, dispatcher, jobs:
//!     → logging.rs (structured tracing events, request IDs from tower-http)
//!     → metrics.rs (job counters, dose value distribution)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Every log line for a job carries `job_id` and `medicine_id`
//! - Metrics are no-ops until a recorder is installed
//! - A failing metrics exporter never stops the service

pub mod logging;
pub mod metrics;
