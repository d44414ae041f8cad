//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper-util accept loop, timeouts, header limit, graceful drain)
//!     → tower-http layers (request ID, trace, request timeout, body limit)
//!     → router.rs (POST /calc_dose/, GET /health)
//!     → handler.rs (parse, submit job, acknowledge)
//!     → error.rs (400/503 with {"message"})
//! ```

pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handler::AppState;
pub use router::{build_router, CALC_DOSE_PATH, HEALTH_PATH};
pub use server::{HttpServer, ServerError, ServerHandle};
