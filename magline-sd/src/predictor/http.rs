//! HTTP predictor client
//!
//! Talks JSON to an asynchronous prediction endpoint: submission returns an
//! inference id immediately, and the output is collected by polling.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use magline_common::types::PredictRow;
use magline_common::{Error, Result};

use super::{Predictor, PredictorState};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Predictor client over a JSON HTTP endpoint
pub struct HttpPredictor {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    job_id: &'a str,
    instances: &'a [PredictRow],
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    inference_id: String,
}

#[derive(Debug, Deserialize)]
struct PollResponse {
    status: String,
    #[serde(default)]
    predictions: Option<Vec<f64>>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpPredictor {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Predictor(format!("HTTP client construction failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn submit(&self, job_id: &str, rows: &[PredictRow]) -> Result<String> {
        let url = format!("{}/inferences", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SubmitRequest {
                job_id,
                instances: rows,
            })
            .send()
            .await
            .map_err(|e| Error::Predictor(format!("submit request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Predictor(format!(
                "submit returned HTTP {}",
                response.status()
            )));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| Error::Predictor(format!("submit response parse failed: {}", e)))?;

        tracing::info!(
            job_id = %job_id,
            inference_id = %body.inference_id,
            rows = rows.len(),
            "Prediction request submitted"
        );

        Ok(body.inference_id)
    }

    async fn poll(&self, job_id: &str, inference_id: &str) -> Result<PredictorState> {
        let url = format!("{}/inferences/{}", self.base_url, inference_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Predictor(format!("poll request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Predictor(format!(
                "poll returned HTTP {}",
                response.status()
            )));
        }

        let body: PollResponse = response
            .json()
            .await
            .map_err(|e| Error::Predictor(format!("poll response parse failed: {}", e)))?;

        match body.status.as_str() {
            "pending" => Ok(PredictorState::Pending),
            "completed" => {
                let predictions = body.predictions.ok_or_else(|| {
                    Error::Predictor("completed inference carried no predictions".to_string())
                })?;
                Ok(PredictorState::Completed(predictions))
            }
            "failed" => Ok(PredictorState::Failed(
                body.error
                    .unwrap_or_else(|| "predictor reported failure".to_string()),
            )),
            other => Err(Error::Predictor(format!(
                "unknown inference status {:?} for job {}",
                other, job_id
            ))),
        }
    }
}
