//! Route table.

use axum::{
    routing::{get, post},
    Router,
};

use crate::http::handler::{health, issue_value, AppState};

/// Path the medicine service posts dose requests to.
pub const CALC_DOSE_PATH: &str = "/calc_dose/";

pub const HEALTH_PATH: &str = "/health";

/// Build the application router. Server-level layers are added by `HttpServer`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(CALC_DOSE_PATH, post(issue_value))
        .route("/calc_dose", post(issue_value))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}
