//! Request handlers.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::dispatch::{JobDispatcher, StatsSnapshot};
use crate::dose::DoseRequest;
use crate::http::error::ApiError;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub dispatcher: JobDispatcher,
}

impl AppState {
    pub fn new(dispatcher: JobDispatcher) -> Self {
        Self { dispatcher }
    }
}

/// Accept a dose request and acknowledge it immediately.
///
/// The body is parsed as JSON whatever its `Content-Type`. The dose itself is
/// computed and reported later by a background job.
pub async fn issue_value(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let request: DoseRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejecting malformed dose request");
        ApiError::BadRequest(e.to_string())
    })?;

    let job_id = state.dispatcher.try_submit(request)?;
    tracing::info!(
        job_id = %job_id,
        medicine_id = request.medicine_id,
        "Dose calculation accepted"
    );

    Ok(StatusCode::OK)
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub jobs: StatsSnapshot,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        jobs: state.dispatcher.stats(),
    })
}
