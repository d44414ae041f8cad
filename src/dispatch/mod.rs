//! Background dose job dispatch.
//!
//! # Data Flow
//! ```text
//! handler
//!     → pool.rs (try_submit: bounded queue, refuse when full)
//!     → dispatcher loop (waits for a worker permit, derives a per-job RNG)
//!     → job.rs (sleep 3s → compute dose → report)
//!     → reporter.rs (PUT to the downstream medicine API)
//!     → stats.rs (accepted / rejected / in-flight / completed / failed)
//! ```
//!
//! # Design Decisions
//! - Jobs are never cancelled: server shutdown does not reach them
//! - No retry of failed reports; a failure is logged and counted
//! - Concurrency and queue depth are configuration, not emergent

pub mod job;
pub mod pool;
pub mod reporter;
pub mod stats;

pub use job::{DoseJob, JobOutcome, PROCESSING_DELAY};
pub use pool::{DispatchError, JobDispatcher};
pub use reporter::{DoseReporter, ReportError};
pub use stats::{DispatchStats, StatsSnapshot};
