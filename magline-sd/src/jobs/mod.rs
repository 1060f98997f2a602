//! Job orchestration
//!
//! The life of a job is a short saga of idempotent steps, each guarded by a
//! precondition on the artifacts it would produce:
//!
//! 1. `create_job`: validate the request, persist the normalized input
//! 2. `synthesize_geometry`: stations + train/predict artifacts
//! 3. `request_inference`: submit predict rows to the predictor
//! 4. `resolve_inference`: poll, fetch predictions when ready
//! 5. `attempt_merge`: reassemble the final ordered result
//!
//! Steps 1–3 run from the job creation path; 4 and 5 are driven by status
//! observations, so progress survives a restart of the submitting task.
//! A step that finds its output already present is a no-op.

pub mod status;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use magline_common::types::{
    FinalRow, JobStatus, MeasuredPoint, PredictRow, SurveyRow, TrainRow,
};
use magline_common::{Error, Result};

use crate::predictor::{Predictor, PredictorState};
use crate::store::{codec, Artifact, ArtifactStore};
use crate::synthesis;

use status::{gather_snapshot, resolve_status, ReportedInference};

/// How the input rows should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Only measured stations are provided; geometry is synthesized at a
    /// fixed spacing and missing stations are predicted.
    SparseOnly,
    /// The full station geometry is provided explicitly; rows without a
    /// value are the ones to predict. No stations are generated.
    ExplicitGeometry,
}

/// Validated parameters of a job, as handed over by intake
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub scenario: Scenario,
    pub rows: Vec<SurveyRow>,
    pub spacing: Option<f64>,
}

/// Record of the submitted prediction request (`inference.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRecord {
    pub inference_id: String,
    pub requested_at: DateTime<Utc>,
}

/// Recorded fatal error (`error.json`); terminal for the job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobErrorRecord {
    pub code: String,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

/// Orchestrates job pipelines over an injected store and predictor.
///
/// Jobs share nothing with each other; the only cross-call state is the
/// in-flight merge guard enforcing at-most-once merge execution per job
/// within this process.
pub struct JobRunner {
    store: Arc<dyn ArtifactStore>,
    predictor: Arc<dyn Predictor>,
    merges_in_flight: Mutex<HashSet<String>>,
}

impl JobRunner {
    pub fn new(store: Arc<dyn ArtifactStore>, predictor: Arc<dyn Predictor>) -> Self {
        Self {
            store,
            predictor,
            merges_in_flight: Mutex::new(HashSet::new()),
        }
    }

    fn new_job_id() -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        format!("mgl-{}", &uuid[..12])
    }

    /// Validate a job spec and persist the normalized input.
    ///
    /// Contract violations are rejected here, before any artifact is
    /// produced. Returns the new job id.
    pub fn create_job(&self, spec: &JobSpec) -> Result<String> {
        validate_spec(spec)?;

        let job_id = Self::new_job_id();
        self.store.create_workspace(&job_id)?;
        self.store
            .write(&job_id, Artifact::Input, &codec::to_csv(&spec.rows)?)?;

        info!(
            job_id = %job_id,
            scenario = ?spec.scenario,
            rows = spec.rows.len(),
            "Job created"
        );
        Ok(job_id)
    }

    /// Synthesize the station geometry and write the train/predict
    /// artifacts. No-op when geometry already exists.
    pub fn synthesize_geometry(&self, job_id: &str, spec: &JobSpec) -> Result<()> {
        if self.store.exists(job_id, Artifact::Train)? {
            return Ok(());
        }

        let stations = match spec.scenario {
            Scenario::SparseOnly => {
                let spacing = spec.spacing.ok_or_else(|| {
                    Error::InvalidInput("sparse_only requires output_spacing".to_string())
                })?;
                let points = measured_points(&spec.rows)?;
                synthesis::build_stations_sparse(points, spacing)?
            }
            Scenario::ExplicitGeometry => synthesis::stations_from_explicit(spec.rows.clone()),
        };

        let train = synthesis::train_rows(&stations);
        let predict = synthesis::predict_rows(&stations);

        self.store
            .write(job_id, Artifact::Train, &codec::to_csv(&train)?)?;
        self.store
            .write(job_id, Artifact::Predict, &codec::to_csv(&predict)?)?;

        info!(
            job_id = %job_id,
            stations = stations.len(),
            train = train.len(),
            predict = predict.len(),
            "Geometry synthesized"
        );
        Ok(())
    }

    /// Submit the to-predict rows to the predictor. No-op when a request
    /// was already submitted or predictions are already present.
    ///
    /// Zero to-predict rows short-circuit: an empty predictions artifact is
    /// recorded and the predictor is never invoked.
    pub async fn request_inference(&self, job_id: &str) -> Result<()> {
        if self.store.exists(job_id, Artifact::InferenceRequest)?
            || self.store.exists(job_id, Artifact::Predictions)?
        {
            return Ok(());
        }

        let predict: Vec<PredictRow> =
            codec::from_csv(&self.store.read(job_id, Artifact::Predict)?)?;

        if predict.is_empty() {
            info!(job_id = %job_id, "No stations to predict; skipping inference");
            self.store
                .write(job_id, Artifact::Predictions, &codec::encode_predictions(&[])?)?;
            return Ok(());
        }

        let inference_id = self.predictor.submit(job_id, &predict).await?;
        let record = InferenceRecord {
            inference_id,
            requested_at: Utc::now(),
        };
        self.store.write(
            job_id,
            Artifact::InferenceRequest,
            &encode_json(&record)?,
        )?;
        Ok(())
    }

    /// Poll the predictor for a submitted request and fetch the output when
    /// it is ready. No-op when predictions are already present or no
    /// request was submitted. Returns the predictor-reported state for the
    /// status snapshot.
    pub async fn resolve_inference(&self, job_id: &str) -> Result<Option<ReportedInference>> {
        if self.store.exists(job_id, Artifact::Predictions)?
            || !self.store.exists(job_id, Artifact::InferenceRequest)?
        {
            return Ok(None);
        }

        let record: InferenceRecord =
            decode_json(&self.store.read(job_id, Artifact::InferenceRequest)?)?;

        match self.predictor.poll(job_id, &record.inference_id).await? {
            PredictorState::Pending => Ok(Some(ReportedInference::Pending)),
            PredictorState::Completed(values) => {
                self.store.write(
                    job_id,
                    Artifact::Predictions,
                    &codec::encode_predictions(&values)?,
                )?;
                info!(job_id = %job_id, values = values.len(), "Predictions fetched");
                Ok(Some(ReportedInference::Completed))
            }
            PredictorState::Failed(reason) => {
                warn!(job_id = %job_id, reason = %reason, "Predictor reported failure");
                self.record_error(job_id, "predictor_failed", &reason)?;
                Ok(Some(ReportedInference::Failed))
            }
        }
    }

    /// Merge predictions with the measured rows into the final artifact, if
    /// the preconditions hold: predictions present, no final result yet, no
    /// recorded error. A row-count mismatch is recorded as the job's
    /// permanent failure and never retried.
    ///
    /// The in-flight guard keeps two concurrent observers from merging the
    /// same job at once; the remaining race across processes is accepted as
    /// a low-severity duplicate write since the merge output is
    /// deterministic.
    pub fn attempt_merge(&self, job_id: &str) -> Result<()> {
        if self.store.exists(job_id, Artifact::Final)?
            || self.store.exists(job_id, Artifact::ErrorRecord)?
            || !self.store.exists(job_id, Artifact::Predictions)?
        {
            return Ok(());
        }

        {
            let mut in_flight = self.merges_in_flight.lock().expect("merge guard poisoned");
            if !in_flight.insert(job_id.to_string()) {
                return Ok(());
            }
        }
        let outcome = self.merge_once(job_id);
        self.merges_in_flight
            .lock()
            .expect("merge guard poisoned")
            .remove(job_id);

        match outcome {
            Ok(()) => Ok(()),
            Err(Error::RowCountMismatch { expected, actual }) => {
                let message = format!(
                    "prediction row count mismatch: expected {}, got {}",
                    expected, actual
                );
                warn!(job_id = %job_id, "{}", message);
                self.record_error(job_id, "row_count_mismatch", &message)
            }
            Err(e) => Err(e),
        }
    }

    fn merge_once(&self, job_id: &str) -> Result<()> {
        let train: Vec<TrainRow> = codec::from_csv(&self.store.read(job_id, Artifact::Train)?)?;
        let predict: Vec<PredictRow> =
            codec::from_csv(&self.store.read(job_id, Artifact::Predict)?)?;
        let predictions =
            codec::decode_predictions(&self.store.read(job_id, Artifact::Predictions)?)?;

        let merged = synthesis::merge_rows(&train, &predict, &predictions)?;

        self.store
            .write(job_id, Artifact::Final, &codec::to_csv(&merged)?)?;
        info!(job_id = %job_id, rows = merged.len(), "Final result merged");
        Ok(())
    }

    /// One status observation: poll the predictor if an inference is
    /// outstanding, opportunistically merge when eligible, then resolve
    /// the status from the resulting snapshot.
    ///
    /// Idempotent and safe to call repeatedly; an observation that finds
    /// the work already done changes nothing.
    pub async fn observe(&self, job_id: &str) -> Result<JobStatus> {
        if !self.store.workspace_exists(job_id)? {
            return Ok(JobStatus::NotFound);
        }

        let mut reported = None;
        let terminal = self.store.exists(job_id, Artifact::ErrorRecord)?
            || self.store.exists(job_id, Artifact::Final)?;
        if !terminal {
            reported = self.resolve_inference(job_id).await?;
            self.attempt_merge(job_id)?;
        }

        let mut snapshot = gather_snapshot(self.store.as_ref(), job_id)?;
        snapshot.reported = reported;
        Ok(resolve_status(&snapshot))
    }

    /// Record a fatal error for the job. The first recorded error wins;
    /// later ones are dropped so the original cause stays visible.
    pub fn record_error(&self, job_id: &str, code: &str, message: &str) -> Result<()> {
        if self.store.exists(job_id, Artifact::ErrorRecord)? {
            return Ok(());
        }
        let record = JobErrorRecord {
            code: code.to_string(),
            message: message.to_string(),
            recorded_at: Utc::now(),
        };
        self.store
            .write(job_id, Artifact::ErrorRecord, &encode_json(&record)?)
    }

    /// Read back the merged result rows
    pub fn final_rows(&self, job_id: &str) -> Result<Vec<FinalRow>> {
        codec::from_csv(&self.store.read(job_id, Artifact::Final)?)
    }

    /// Read back the recorded error, if any
    pub fn recorded_error(&self, job_id: &str) -> Result<Option<JobErrorRecord>> {
        if !self.store.exists(job_id, Artifact::ErrorRecord)? {
            return Ok(None);
        }
        Ok(Some(decode_json(
            &self.store.read(job_id, Artifact::ErrorRecord)?,
        )?))
    }

    /// Measured and generated geometry for plotting, read back from the
    /// train/predict artifacts
    pub fn preview(&self, job_id: &str) -> Result<(Vec<TrainRow>, Vec<PredictRow>)> {
        let train = codec::from_csv(&self.store.read(job_id, Artifact::Train)?)?;
        let predict = codec::from_csv(&self.store.read(job_id, Artifact::Predict)?)?;
        Ok((train, predict))
    }
}

/// Reject contract violations before any artifact is produced
fn validate_spec(spec: &JobSpec) -> Result<()> {
    if spec.rows.is_empty() {
        return Err(Error::InvalidInput(
            "no usable input rows; a geometry requires at least one measured point".to_string(),
        ));
    }

    match spec.scenario {
        Scenario::SparseOnly => {
            let spacing = spec.spacing.ok_or_else(|| {
                Error::InvalidInput("sparse_only requires output_spacing".to_string())
            })?;
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(Error::InvalidInput(format!(
                    "output_spacing must be a positive number, got {}",
                    spacing
                )));
            }
            if spec.rows.iter().any(|r| r.value.is_none()) {
                return Err(Error::InvalidInput(
                    "sparse_only requires a value on every row".to_string(),
                ));
            }
        }
        Scenario::ExplicitGeometry => {
            if spec.spacing.is_some() {
                return Err(Error::InvalidInput(
                    "explicit_geometry must not define output_spacing".to_string(),
                ));
            }
        }
    }
    Ok(())
}

fn measured_points(rows: &[SurveyRow]) -> Result<Vec<MeasuredPoint>> {
    rows.iter()
        .map(|r| {
            let value = r.value.ok_or_else(|| {
                Error::InvalidInput("sparse_only requires a value on every row".to_string())
            })?;
            Ok(MeasuredPoint {
                x: r.x,
                y: r.y,
                value,
            })
        })
        .collect()
}

fn encode_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value)
        .map_err(|e| Error::Internal(format!("JSON encode failed: {}", e)))
}

fn decode_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::Internal(format!("JSON decode failed: {}", e)))
}
