//! Job API handlers
//!
//! POST /jobs, GET /jobs/:id/status, GET /jobs/:id/result,
//! GET /jobs/:id/preview

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use magline_common::types::{FinalRow, JobStatus};

use crate::error::{ApiError, ApiResult};
use crate::intake::{self, ColumnMapping};
use crate::jobs::{JobSpec, Scenario};
use crate::AppState;

/// POST /jobs request
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    /// How the uploaded CSV should be interpreted
    pub scenario: Scenario,
    /// Column name for the X coordinate (e.g. longitude or easting)
    pub x_column: String,
    /// Column name for the Y coordinate (e.g. latitude or northing)
    pub y_column: String,
    /// Column name for the measured values
    pub value_column: Option<String>,
    /// Desired station spacing for generated points (sparse_only)
    pub output_spacing: Option<f64>,
    /// Raw CSV text with a header row
    pub csv_data: String,
}

/// Minimal response returned once a job has been accepted
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job_id: String,
    pub status: JobStatus,
}

/// GET /jobs/:id/status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub job_id: String,
    pub status: JobStatus,
}

/// 2-D position for geometry preview plots
#[derive(Debug, Serialize)]
pub struct PreviewPoint {
    pub x: f64,
    pub y: f64,
}

/// GET /jobs/:id/preview response
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub measured: Vec<PreviewPoint>,
    pub generated: Vec<PreviewPoint>,
}

/// POST /jobs
///
/// Validate the request, persist the normalized input, and kick off the
/// pipeline in the background. Contract violations come back immediately as
/// 400 with no artifacts produced.
pub async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> ApiResult<Json<JobResponse>> {
    // Scenario enforcement mirrors the boundary contract: sparse mode needs
    // a value on every station and a spacing to synthesize at; explicit
    // geometry brings its own stations.
    let value_column = request.value_column.as_deref().ok_or_else(|| {
        ApiError::BadRequest("value_column is required".to_string())
    })?;
    match request.scenario {
        Scenario::SparseOnly => {
            if request.output_spacing.is_none() {
                return Err(ApiError::BadRequest(
                    "sparse_only requires value_column and output_spacing".to_string(),
                ));
            }
        }
        Scenario::ExplicitGeometry => {
            if request.output_spacing.is_some() {
                return Err(ApiError::BadRequest(
                    "explicit_geometry must not define output_spacing".to_string(),
                ));
            }
        }
    }

    let mapping = ColumnMapping {
        x_column: request.x_column.clone(),
        y_column: request.y_column.clone(),
        value_column: Some(value_column.to_string()),
    };
    let rows = intake::parse_rows(&request.csv_data, &mapping)?;

    let spec = JobSpec {
        scenario: request.scenario,
        rows,
        spacing: request.output_spacing,
    };

    let job_id = state.runner.create_job(&spec)?;
    let response = JobResponse {
        job_id: job_id.clone(),
        status: JobStatus::Accepted,
    };

    // Geometry synthesis and prediction submission continue in the
    // background; later progress is driven by status polls.
    let runner = state.runner.clone();
    tokio::spawn(async move {
        if let Err(e) = run_pipeline(runner, job_id.clone(), spec).await {
            tracing::error!(job_id = %job_id, error = %e, "Job pipeline task failed");
        }
    });

    Ok(Json(response))
}

async fn run_pipeline(
    runner: std::sync::Arc<crate::jobs::JobRunner>,
    job_id: String,
    spec: JobSpec,
) -> magline_common::Result<()> {
    runner.synthesize_geometry(&job_id, &spec)?;
    runner.request_inference(&job_id).await
}

/// GET /jobs/:id/status
///
/// Recompute and return the job status. Observation may advance the job:
/// a resolved inference is fetched and an eligible merge is attempted, so
/// polling is all a caller needs to drive a job to completion.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    let status = state.runner.observe(&job_id).await?;
    Ok(Json(StatusResponse { job_id, status }))
}

/// GET /jobs/:id/result
///
/// Return the merged final rows for a complete job. A failed job exposes
/// its recorded error; anything earlier in the lifecycle is not ready.
pub async fn job_result(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<Vec<FinalRow>>> {
    let status = state.runner.observe(&job_id).await?;
    match status {
        JobStatus::Complete => Ok(Json(state.runner.final_rows(&job_id)?)),
        JobStatus::NotFound => Err(ApiError::NotFound(format!("Job not found: {}", job_id))),
        JobStatus::Failed => {
            let message = state
                .runner
                .recorded_error(&job_id)?
                .map(|e| e.message)
                .unwrap_or_else(|| "job failed".to_string());
            Err(ApiError::Conflict(message))
        }
        other => Err(ApiError::NotFound(format!(
            "Result not ready: job {} is {}",
            job_id, other
        ))),
    }
}

/// GET /jobs/:id/preview
///
/// Measured vs generated station positions for plotting.
pub async fn job_preview(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<PreviewResponse>> {
    let (train, predict) = state
        .runner
        .preview(&job_id)
        .map_err(|_| ApiError::NotFound(format!("Job not found: {}", job_id)))?;

    Ok(Json(PreviewResponse {
        measured: train
            .iter()
            .map(|r| PreviewPoint { x: r.x, y: r.y })
            .collect(),
        generated: predict
            .iter()
            .map(|r| PreviewPoint { x: r.x, y: r.y })
            .collect(),
    }))
}
