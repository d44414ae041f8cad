//! Dose domain: request/report payloads and the dose calculation.
//!
//! # Data Flow
//! ```text
//! POST body
//!     → types.rs (DoseRequest)
//!     → [job delay]
//!     → calculator.rs (compute_dose with an owned RNG)
//!     → types.rs (DoseReport)
//!     → downstream PUT
//! ```

pub mod calculator;
pub mod types;

pub use calculator::compute_dose;
pub use types::{DoseReport, DoseRequest, DoseValue, ACCESS_KEY};
