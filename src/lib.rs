//! Dose calculation service library.

pub mod config;
pub mod dispatch;
pub mod dose;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::ServiceConfig;
pub use dispatch::JobDispatcher;
pub use http::{HttpServer, ServerHandle};
pub use lifecycle::Shutdown;

use crate::dispatch::{DoseReporter, ReportError};
use crate::http::{build_router, AppState};

/// Assemble the dispatcher and HTTP server described by `config`.
///
/// Must be called inside a Tokio runtime: the dispatcher task is spawned here.
pub fn build_service(config: &ServiceConfig) -> Result<(HttpServer, JobDispatcher), ReportError> {
    let reporter = DoseReporter::new(&config.downstream)?;
    let dispatcher = JobDispatcher::start(&config.workers, reporter);
    let router = build_router(AppState::new(dispatcher.clone()));
    let server = HttpServer::new(config.listener.clone(), router);
    Ok((server, dispatcher))
}
