//! Station synthesis pipeline core
//!
//! Turns a sparse set of measured points into a densified, classified set of
//! stations along the traverse, and merges externally predicted values back
//! into the final ordered output:
//!
//! raw points → traverse ordering → arclength parameterization → station
//! generation → classification → train/predict split → (external predictor)
//! → result merge
//!
//! Every step is a synchronous, CPU-bound transformation over a bounded
//! in-memory point set; concurrency exists only at the job level.

pub mod geometry;
pub mod merge;
pub mod stations;

pub use geometry::{generate_targets, order_along_traverse, parameterize, TargetStation};
pub use merge::merge_rows;
pub use stations::{
    build_stations_sparse, classify_stations, predict_rows, split_train_predict,
    stations_from_explicit, train_rows,
};

/// Distance tolerance (in x/y units) for matching a generated station to a
/// measured point, and for detecting degenerate interpolation segments.
///
/// Floating-point arclength accumulation makes exact equality unreliable
/// even when a generated target is deliberately placed at a true measurement
/// distance.
pub const MATCH_TOLERANCE: f64 = 1e-3;
