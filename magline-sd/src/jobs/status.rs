//! Job status resolution
//!
//! Status is never stored. It is recomputed on every observation from an
//! explicit snapshot of artifact presence plus the predictor-reported state,
//! so the resolver stays a pure function that can be called repeatedly.

use magline_common::types::JobStatus;
use magline_common::Result;

use crate::store::{Artifact, ArtifactStore};

/// Predictor-reported state of the in-flight inference at observation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportedInference {
    Pending,
    Completed,
    Failed,
}

/// Everything the status decision depends on, captured at one instant
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactSnapshot {
    pub workspace_exists: bool,
    pub error_recorded: bool,
    pub final_exists: bool,
    pub predictions_exist: bool,
    pub inference_requested: bool,
    pub geometry_exists: bool,
    pub reported: Option<ReportedInference>,
}

/// Capture the artifact half of a snapshot from the store. The predictor
/// report, if any, is filled in by the caller.
pub fn gather_snapshot(store: &dyn ArtifactStore, job_id: &str) -> Result<ArtifactSnapshot> {
    if !store.workspace_exists(job_id)? {
        return Ok(ArtifactSnapshot::default());
    }

    Ok(ArtifactSnapshot {
        workspace_exists: true,
        error_recorded: store.exists(job_id, Artifact::ErrorRecord)?,
        final_exists: store.exists(job_id, Artifact::Final)?,
        predictions_exist: store.exists(job_id, Artifact::Predictions)?,
        inference_requested: store.exists(job_id, Artifact::InferenceRequest)?,
        geometry_exists: store.exists(job_id, Artifact::Train)?,
        reported: None,
    })
}

/// Resolve the externally visible status from a snapshot.
///
/// An order-sensitive decision table, evaluated top to bottom with first
/// match winning. The states are not mutually exclusive by construction, so
/// the priority order encodes severity and recency.
pub fn resolve_status(snapshot: &ArtifactSnapshot) -> JobStatus {
    if !snapshot.workspace_exists {
        return JobStatus::NotFound;
    }
    if snapshot.error_recorded {
        return JobStatus::Failed;
    }
    if snapshot.final_exists {
        return JobStatus::Complete;
    }
    if snapshot.predictions_exist {
        return JobStatus::Merging;
    }
    if snapshot.reported == Some(ReportedInference::Failed) {
        return JobStatus::Failed;
    }
    if snapshot.reported == Some(ReportedInference::Completed) {
        return JobStatus::CompletedInference;
    }
    if snapshot.inference_requested {
        return JobStatus::Inferencing;
    }
    if snapshot.geometry_exists {
        return JobStatus::Processing;
    }
    JobStatus::Accepted
}
