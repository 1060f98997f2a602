//! Scripted predictor for tests
//!
//! Stands in for the external prediction service so job lifecycle tests can
//! run without a network. Scripted with an outcome and an optional number
//! of pending polls before that outcome is reported.

use std::sync::Mutex;

use async_trait::async_trait;

use magline_common::types::PredictRow;
use magline_common::Result;

use super::{Predictor, PredictorState};

enum Outcome {
    Values(Vec<f64>),
    Failure(String),
}

/// Predictor double that replays a scripted outcome
pub struct MockPredictor {
    outcome: Outcome,
    pending_polls: Mutex<usize>,
    submissions: Mutex<Vec<(String, Vec<PredictRow>)>>,
}

impl MockPredictor {
    /// Completes immediately with the given values
    pub fn completing_with(values: Vec<f64>) -> Self {
        Self {
            outcome: Outcome::Values(values),
            pending_polls: Mutex::new(0),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Reports `pending` for the first `polls` polls, then completes
    pub fn pending_then(values: Vec<f64>, polls: usize) -> Self {
        Self {
            outcome: Outcome::Values(values),
            pending_polls: Mutex::new(polls),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Reports failure with the given reason
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failure(reason.into()),
            pending_polls: Mutex::new(0),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Rows submitted so far, in submission order
    pub fn submitted(&self) -> Vec<(String, Vec<PredictRow>)> {
        self.submissions.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl Predictor for MockPredictor {
    async fn submit(&self, job_id: &str, rows: &[PredictRow]) -> Result<String> {
        let mut submissions = self.submissions.lock().expect("mock lock poisoned");
        submissions.push((job_id.to_string(), rows.to_vec()));
        Ok(format!("mock-inference-{}", submissions.len()))
    }

    async fn poll(&self, _job_id: &str, _inference_id: &str) -> Result<PredictorState> {
        let mut pending = self.pending_polls.lock().expect("mock lock poisoned");
        if *pending > 0 {
            *pending -= 1;
            return Ok(PredictorState::Pending);
        }

        match &self.outcome {
            Outcome::Values(values) => Ok(PredictorState::Completed(values.clone())),
            Outcome::Failure(reason) => Ok(PredictorState::Failed(reason.clone())),
        }
    }
}
