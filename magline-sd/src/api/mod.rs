//! HTTP API handlers for magline-sd

pub mod health;
pub mod jobs;

pub use health::health_routes;
pub use jobs::{create_job, job_preview, job_result, job_status};
