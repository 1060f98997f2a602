//! CSV encoding/decoding for tabular artifacts
//!
//! Artifacts are headered CSV so they stay inspectable with ordinary tools.
//! Row shapes are the serde types from `magline-common`; this module only
//! moves them through the `csv` crate.

use magline_common::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One row of the predictions artifact
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub predicted_value: f64,
}

/// Serialize rows to headered CSV bytes. An empty slice yields empty bytes.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| Error::Internal(format!("CSV encode failed: {}", e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Internal(format!("CSV flush failed: {}", e)))
}

/// Deserialize rows from headered CSV bytes. Empty bytes yield no rows.
pub fn from_csv<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record.map_err(|e| Error::Internal(format!("CSV decode failed: {}", e)))?);
    }
    Ok(rows)
}

/// Encode a predictions artifact from bare values, preserving order
pub fn encode_predictions(values: &[f64]) -> Result<Vec<u8>> {
    let rows: Vec<PredictionRow> = values
        .iter()
        .map(|&predicted_value| PredictionRow { predicted_value })
        .collect();
    to_csv(&rows)
}

/// Decode a predictions artifact back into bare values, preserving order
pub fn decode_predictions(bytes: &[u8]) -> Result<Vec<f64>> {
    Ok(from_csv::<PredictionRow>(bytes)?
        .into_iter()
        .map(|r| r.predicted_value)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use magline_common::types::{FinalRow, TrainRow, ValueSource};

    #[test]
    fn test_train_rows_round_trip() {
        let rows = vec![
            TrainRow {
                x: 0.0,
                y: 0.0,
                d_along: 0.0,
                value: 10.0,
            },
            TrainRow {
                x: 10.0,
                y: 0.0,
                d_along: 10.0,
                value: 20.0,
            },
        ];

        let bytes = to_csv(&rows).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("x,y,d_along,value\n"));

        let decoded: Vec<TrainRow> = from_csv(&bytes).unwrap();
        assert_eq!(decoded, rows);
    }

    #[test]
    fn test_final_rows_carry_source_labels() {
        let rows = vec![FinalRow {
            x: 1.0,
            y: 2.0,
            d_along: 3.0,
            value: 4.0,
            source: ValueSource::Predicted,
        }];

        let bytes = to_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("predicted"));
    }

    #[test]
    fn test_empty_rows_round_trip() {
        let bytes = to_csv::<TrainRow>(&[]).unwrap();
        assert!(bytes.is_empty());

        let decoded: Vec<TrainRow> = from_csv(&bytes).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_predictions_round_trip() {
        let values = vec![1.5, -2.25, 0.0];
        let bytes = encode_predictions(&values).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("predicted_value\n"));

        assert_eq!(decode_predictions(&bytes).unwrap(), values);
    }
}
