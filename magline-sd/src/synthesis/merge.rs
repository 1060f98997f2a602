//! Result merge: reassemble measured rows and predicted values into the
//! final ordered output

use magline_common::types::{FinalRow, PredictRow, TrainRow, ValueSource};
use magline_common::{Error, Result};

/// Combine measured rows with externally supplied predictions into the final
/// ordered output.
///
/// `predictions` must align positionally with `predict` one-to-one; that
/// alignment is the only correspondence between a prediction and its station
/// (there is no key-based join), so any count mismatch is fatal and nothing
/// is produced. The combined rows are stable-sorted by `d_along` ascending.
pub fn merge_rows(
    train: &[TrainRow],
    predict: &[PredictRow],
    predictions: &[f64],
) -> Result<Vec<FinalRow>> {
    if predict.len() != predictions.len() {
        return Err(Error::RowCountMismatch {
            expected: predict.len(),
            actual: predictions.len(),
        });
    }

    let mut rows: Vec<FinalRow> = Vec::with_capacity(train.len() + predict.len());

    rows.extend(train.iter().map(|t| FinalRow {
        x: t.x,
        y: t.y,
        d_along: t.d_along,
        value: t.value,
        source: ValueSource::Measured,
    }));

    rows.extend(predict.iter().zip(predictions).map(|(p, &value)| FinalRow {
        x: p.x,
        y: p.y,
        d_along: p.d_along,
        value,
        source: ValueSource::Predicted,
    }));

    rows.sort_by(|a, b| a.d_along.total_cmp(&b.d_along));

    Ok(rows)
}
