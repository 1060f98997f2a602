//! magline-sd library - Station Densifier service
//!
//! Ingests sparse survey measurements taken along a physical traverse,
//! densifies them into fixed-spacing stations, hands the unmeasured
//! stations to an external predictor, and merges the predictions back into
//! a single ordered result per job.

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod intake;
pub mod jobs;
pub mod predictor;
pub mod store;
pub mod synthesis;

use jobs::JobRunner;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Job orchestrator over the injected store and predictor
    pub runner: Arc<JobRunner>,
}

impl AppState {
    /// Create new application state
    pub fn new(runner: Arc<JobRunner>) -> Self {
        Self { runner }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/jobs", post(api::create_job))
        .route("/jobs/:job_id/status", get(api::job_status))
        .route("/jobs/:job_id/result", get(api::job_result))
        .route("/jobs/:job_id/preview", get(api::job_preview))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
