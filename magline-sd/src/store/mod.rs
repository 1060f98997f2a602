//! Per-job artifact storage
//!
//! Every job owns a workspace holding a small, fixed set of named artifacts.
//! Pipeline steps and the status resolver go through the [`ArtifactStore`]
//! abstraction rather than hard-coded paths, so the same code runs against
//! the filesystem layout in production and an in-memory store in tests.

pub mod codec;
pub mod fs;
pub mod mem;

pub use fs::FsStore;
pub use mem::MemStore;

use magline_common::Result;

/// The fixed set of artifacts a job workspace can hold.
///
/// Artifact presence drives the externally visible job status, so the set
/// and its meaning are part of the service contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Normalized input rows as handed over by intake
    Input,
    /// Measured stations: ground truth for the predictor
    Train,
    /// Stations needing a value: geometry only, value withheld
    Predict,
    /// Record of the submitted prediction request
    InferenceRequest,
    /// Raw predictor output, one value per predict row
    Predictions,
    /// Merged final result, the user-facing deliverable
    Final,
    /// Recorded fatal error; terminal for the job
    ErrorRecord,
}

impl Artifact {
    /// File name of this artifact inside a job workspace
    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::Input => "input.csv",
            Artifact::Train => "train.csv",
            Artifact::Predict => "predict.csv",
            Artifact::InferenceRequest => "inference.json",
            Artifact::Predictions => "predictions.csv",
            Artifact::Final => "final.csv",
            Artifact::ErrorRecord => "error.json",
        }
    }
}

/// Storage abstraction over per-job artifact workspaces
pub trait ArtifactStore: Send + Sync {
    /// True when a workspace has been created for the job
    fn workspace_exists(&self, job_id: &str) -> Result<bool>;

    /// Create the workspace for a job (idempotent)
    fn create_workspace(&self, job_id: &str) -> Result<()>;

    /// True when the artifact has been written for the job
    fn exists(&self, job_id: &str, artifact: Artifact) -> Result<bool>;

    /// Read an artifact's raw bytes. Missing artifacts are a NotFound error.
    fn read(&self, job_id: &str, artifact: Artifact) -> Result<Vec<u8>>;

    /// Write an artifact's raw bytes, replacing any previous contents
    fn write(&self, job_id: &str, artifact: Artifact, bytes: &[u8]) -> Result<()>;
}
