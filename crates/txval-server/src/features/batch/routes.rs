//! Batch job routes
//!
//! - `POST /start` — launch a validation job; `inputFile` query parameter
//!   overrides the configured input path. Returns immediately with the job
//!   id; the job runs on a background task.
//! - `GET /status/:job_id` — render the job's status projection.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use super::super::FeatureState;
use crate::error::AppError;
use crate::jobs::{JobStatus, JobStatusProjection};

/// Create batch routes
pub fn batch_routes() -> Router<FeatureState> {
    Router::new()
        .route("/start", post(start_job))
        .route("/status/:job_id", get(job_status))
}

#[derive(Debug, Deserialize)]
struct StartParams {
    #[serde(rename = "inputFile")]
    input_file: Option<String>,
}

/// Response to a job submission
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStartResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub input_file: String,
    pub start_time: DateTime<Utc>,
}

/// Start a transaction validation job
///
/// POST /start?inputFile=/path/to/transactions.csv
async fn start_job(
    State(state): State<FeatureState>,
    Query(params): Query<StartParams>,
) -> Result<Json<JobStartResponse>, AppError> {
    let input_override = params
        .input_file
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from);

    let job_id = state.coordinator.start_job(input_override);
    let job = state
        .repository
        .get(job_id)
        .ok_or_else(|| AppError::Internal(format!("job '{job_id}' vanished after launch")))?;

    tracing::info!(
        job_id = %job_id,
        input_file = %job.parameters.input_file.display(),
        "job start accepted"
    );

    Ok(Json(JobStartResponse {
        job_id,
        status: job.status,
        input_file: job.parameters.input_file.display().to_string(),
        start_time: job.start_ts,
    }))
}

/// Get job execution status
///
/// GET /status/:job_id
async fn job_status(
    State(state): State<FeatureState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobStatusProjection>, AppError> {
    let job = state
        .repository
        .get(job_id)
        .ok_or_else(|| AppError::NotFound(format!("job '{job_id}' not found")))?;

    Ok(Json(JobStatusProjection::from_execution(&job)))
}
