//! External predictor boundary
//!
//! The predictor computes values for generated stations. From this service's
//! perspective it is an opaque submit/poll relationship: geometry rows go
//! out, an inference id comes back, and polling eventually reports the
//! ordered predicted values or an explicit failure. Retry policy for
//! transient transport errors belongs to the predictor collaborator, not the
//! pipeline core.

pub mod http;
pub mod mock;

pub use http::HttpPredictor;
pub use mock::MockPredictor;

use async_trait::async_trait;
use magline_common::types::PredictRow;
use magline_common::Result;

/// State the predictor reports for a submitted request.
///
/// Completed predictions are one-to-one positionally aligned with the
/// submitted predict rows; the predictor is responsible for preserving
/// order end-to-end.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictorState {
    /// Request accepted, output not yet available
    Pending,
    /// Output available: one value per submitted row, in submission order
    Completed(Vec<f64>),
    /// The predictor gave up on this request
    Failed(String),
}

/// Client for the external prediction service
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Submit the to-predict rows for a job. Returns the predictor's
    /// inference id for later polling.
    async fn submit(&self, job_id: &str, rows: &[PredictRow]) -> Result<String>;

    /// Report the current state of a submitted request. Safe to call
    /// repeatedly; polling has no side effects on the predictor.
    async fn poll(&self, job_id: &str, inference_id: &str) -> Result<PredictorState>;
}
