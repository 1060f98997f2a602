//! Station classification and train/predict partitioning

use magline_common::types::{
    MeasuredPoint, ParameterizedPoint, PredictRow, Station, SurveyRow, TrainRow,
};
use magline_common::Result;

use super::geometry::{generate_targets, order_along_traverse, parameterize, TargetStation};
use super::MATCH_TOLERANCE;

/// Assign each generated target a sequential `station_index` and determine
/// whether it coincides with a real measurement.
///
/// A target is measured when some parameterized point's `d_along` is within
/// the matching tolerance; measured points are scanned in traverse order and
/// the first match wins, so ties are broken by encounter order. Matches copy
/// the measurement's value; unmatched targets carry none.
pub fn classify_stations(
    targets: &[TargetStation],
    measured: &[ParameterizedPoint],
) -> Vec<Station> {
    targets
        .iter()
        .enumerate()
        .map(|(idx, target)| {
            let matched = measured
                .iter()
                .find(|m| (m.d_along - target.d_along).abs() <= MATCH_TOLERANCE);

            Station {
                station_index: idx,
                x: target.x,
                y: target.y,
                d_along: target.d_along,
                measured: matched.is_some(),
                value: matched.map(|m| m.value),
            }
        })
        .collect()
}

/// Run the full sparse-mode synthesis: order the measured points, compute
/// the arclength parameterization, generate targets at `spacing`, and
/// classify them against the measurements.
pub fn build_stations_sparse(points: Vec<MeasuredPoint>, spacing: f64) -> Result<Vec<Station>> {
    let ordered = order_along_traverse(points);
    let parameterized = parameterize(&ordered);
    let targets = generate_targets(&parameterized, spacing)?;
    Ok(classify_stations(&targets, &parameterized))
}

/// Build stations from explicit caller-supplied geometry: every input row is
/// a station, ordered and parameterized along the traverse. Rows without a
/// value are the ones needing prediction.
pub fn stations_from_explicit(rows: Vec<SurveyRow>) -> Vec<Station> {
    let ordered = order_along_traverse(rows);

    let mut stations = Vec::with_capacity(ordered.len());
    let mut d = 0.0;
    for (i, row) in ordered.iter().enumerate() {
        if i > 0 {
            let prev = &ordered[i - 1];
            d += (row.x - prev.x).hypot(row.y - prev.y);
        }
        stations.push(Station {
            station_index: i,
            x: row.x,
            y: row.y,
            d_along: d,
            measured: row.value.is_some(),
            value: row.value,
        });
    }
    stations
}

/// Partition classified stations into the measured subset and the to-predict
/// subset, preserving `station_index` and relative order within each subset.
/// Pure partition; no further transformation.
pub fn split_train_predict(stations: &[Station]) -> (Vec<Station>, Vec<Station>) {
    let mut train = Vec::new();
    let mut predict = Vec::new();

    for station in stations {
        if station.measured {
            train.push(station.clone());
        } else {
            predict.push(station.clone());
        }
    }

    (train, predict)
}

/// Project measured stations onto the predictor boundary contract
pub fn train_rows(stations: &[Station]) -> Vec<TrainRow> {
    stations
        .iter()
        .filter(|s| s.measured)
        .filter_map(|s| {
            s.value.map(|value| TrainRow {
                x: s.x,
                y: s.y,
                d_along: s.d_along,
                value,
            })
        })
        .collect()
}

/// Project to-predict stations onto the predictor boundary contract.
/// The value field is withheld by construction.
pub fn predict_rows(stations: &[Station]) -> Vec<PredictRow> {
    stations
        .iter()
        .filter(|s| !s.measured)
        .map(|s| PredictRow {
            x: s.x,
            y: s.y,
            d_along: s.d_along,
        })
        .collect()
}
