//! # Magline Common Library
//!
//! Shared code for the magline services including:
//! - Survey data model (points, stations, predictor boundary rows)
//! - Job status enumeration
//! - Error types
//! - Configuration loading

pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::JobStatus;
