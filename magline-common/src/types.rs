//! Survey data model shared across magline services
//!
//! The types here trace the life of a survey job: raw measured points come
//! in, get ordered and parameterized along the traverse, become stations at
//! a fixed spacing, and finally merge with predicted values into the ordered
//! result rows handed back to the caller.

use serde::{Deserialize, Serialize};

/// One ground-truth observation along the traverse. Immutable once ingested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

/// One validated input row handed over by intake. In sparse mode every row
/// carries a value; in explicit-geometry mode rows without a value mark the
/// stations whose values must be predicted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyRow {
    pub x: f64,
    pub y: f64,
    pub value: Option<f64>,
}

/// A measured point annotated with `d_along`, the cumulative arclength from
/// the first point in traverse order.
///
/// Invariant: `d_along` is non-decreasing in traverse order and the first
/// point carries `d_along == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterizedPoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub d_along: f64,
}

/// A position along the traverse, either directly measured or synthesized at
/// regular spacing.
///
/// `station_index` is a dense 0-based sequence number assigned in traversal
/// order at generation time; it is never reused or reordered afterwards.
/// `value` is present iff `measured` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub station_index: usize,
    pub x: f64,
    pub y: f64,
    pub d_along: f64,
    pub measured: bool,
    pub value: Option<f64>,
}

/// Predictor boundary projection of a measured station (ground truth).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainRow {
    pub x: f64,
    pub y: f64,
    pub d_along: f64,
    pub value: f64,
}

/// Predictor boundary projection of a station needing a value.
/// The value field is intentionally absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictRow {
    pub x: f64,
    pub y: f64,
    pub d_along: f64,
}

/// Provenance of a merged row's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Measured,
    Predicted,
}

/// One row of the merged output, the single user-facing deliverable of a
/// completed job. The full sequence is sorted by `d_along` ascending and its
/// length equals train rows + predict rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalRow {
    pub x: f64,
    pub y: f64,
    pub d_along: f64,
    pub value: f64,
    pub source: ValueSource,
}

/// Externally visible job status.
///
/// Derived, never stored as its own source of truth: a pure function of
/// artifact presence and predictor-reported state at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Raw input persisted, geometry not yet computed
    Accepted,
    /// Geometry and train/predict artifacts exist, no prediction request yet
    Processing,
    /// Prediction request submitted but not yet resolved
    Inferencing,
    /// Predictor reports completion, raw output not yet fetched
    CompletedInference,
    /// Predictor output fetched, final result not yet merged
    Merging,
    /// Final merged result exists
    Complete,
    /// A fatal error was recorded, or the predictor reported failure
    Failed,
    /// No workspace exists for the job
    NotFound,
}

impl JobStatus {
    /// Wire representation, exposed verbatim to callers
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Accepted => "accepted",
            JobStatus::Processing => "processing",
            JobStatus::Inferencing => "inferencing",
            JobStatus::CompletedInference => "completed_inference",
            JobStatus::Merging => "merging",
            JobStatus::Complete => "complete",
            JobStatus::Failed => "failed",
            JobStatus::NotFound => "not_found",
        }
    }

    /// True for states that no longer change without external intervention
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
