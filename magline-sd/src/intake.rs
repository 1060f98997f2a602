//! CSV intake and column mapping
//!
//! The intake collaborator turns raw uploaded CSV text into validated
//! `SurveyRow`s. Column names are matched case- and whitespace-insensitively
//! against the caller's mapping, so "  Longitude " in the header satisfies
//! an `x_column` of "longitude". The pipeline core never sees raw text or
//! column names; it receives strongly typed rows only.

use std::collections::HashMap;

use tracing::warn;

use magline_common::types::SurveyRow;
use magline_common::{Error, Result};

/// Caller-supplied mapping from CSV columns to row fields
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub x_column: String,
    pub y_column: String,
    /// Absent when the scenario carries no values (never the case today,
    /// but the mapping mirrors the request shape)
    pub value_column: Option<String>,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parse CSV text into survey rows using the given column mapping.
///
/// Missing required columns are an input contract violation. Rows whose
/// coordinates fail to parse are excluded (with a warning); an empty value
/// field yields a row without a value, and a non-empty value that fails to
/// parse is a contract violation rather than a silent hole in the data.
pub fn parse_rows(csv_text: &str, mapping: &ColumnMapping) -> Result<Vec<SurveyRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::InvalidInput(format!("CSV header parse failed: {}", e)))?
        .clone();

    let by_name: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize(name), idx))
        .collect();

    let resolve = |column: &str| -> Result<usize> {
        by_name.get(&normalize(column)).copied().ok_or_else(|| {
            Error::InvalidInput(format!("Missing required column: {}", column))
        })
    };

    let x_idx = resolve(&mapping.x_column)?;
    let y_idx = resolve(&mapping.y_column)?;
    let value_idx = match &mapping.value_column {
        Some(column) => Some(resolve(column)?),
        None => None,
    };

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| Error::InvalidInput(format!("CSV record parse failed: {}", e)))?;

        let x = record.get(x_idx).and_then(|f| f.parse::<f64>().ok());
        let y = record.get(y_idx).and_then(|f| f.parse::<f64>().ok());
        let (x, y) = match (x, y) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                warn!(row = line + 1, "Excluding row with unparseable coordinates");
                continue;
            }
        };

        let value = match value_idx {
            None => None,
            Some(idx) => {
                let field = record.get(idx).unwrap_or("");
                if field.is_empty() {
                    None
                } else {
                    Some(field.parse::<f64>().map_err(|_| {
                        Error::InvalidInput(format!(
                            "Unparseable value {:?} on data row {}",
                            field,
                            line + 1
                        ))
                    })?)
                }
            }
        };

        rows.push(SurveyRow { x, y, value });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(x: &str, y: &str, value: Option<&str>) -> ColumnMapping {
        ColumnMapping {
            x_column: x.to_string(),
            y_column: y.to_string(),
            value_column: value.map(|v| v.to_string()),
        }
    }

    #[test]
    fn test_basic_parsing() {
        let csv_text = "x,y,mag\n0,0,10\n10,0,20\n";
        let rows = parse_rows(csv_text, &mapping("x", "y", Some("mag"))).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].x, 0.0);
        assert_eq!(rows[1].value, Some(20.0));
    }

    #[test]
    fn test_headers_match_case_and_whitespace_insensitively() {
        let csv_text = " Longitude , LATITUDE ,Mag\n1.5,2.5,3.5\n";
        let rows = parse_rows(csv_text, &mapping("longitude", "latitude", Some("MAG"))).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].x, 1.5);
        assert_eq!(rows[0].y, 2.5);
        assert_eq!(rows[0].value, Some(3.5));
    }

    #[test]
    fn test_missing_column_is_a_contract_violation() {
        let csv_text = "x,y\n1,2\n";
        let err = parse_rows(csv_text, &mapping("x", "y", Some("mag"))).unwrap_err();
        assert!(err.to_string().contains("mag"));
    }

    #[test]
    fn test_unparseable_coordinates_are_excluded() {
        let csv_text = "x,y,mag\n1,2,3\nnot-a-number,4,5\n6,7,8\n";
        let rows = parse_rows(csv_text, &mapping("x", "y", Some("mag"))).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].x, 1.0);
        assert_eq!(rows[1].x, 6.0);
    }

    #[test]
    fn test_empty_value_field_means_no_value() {
        let csv_text = "x,y,mag\n1,2,\n3,4,5\n";
        let rows = parse_rows(csv_text, &mapping("x", "y", Some("mag"))).unwrap();

        assert_eq!(rows[0].value, None);
        assert_eq!(rows[1].value, Some(5.0));
    }

    #[test]
    fn test_garbage_value_field_is_rejected() {
        let csv_text = "x,y,mag\n1,2,oops\n";
        assert!(parse_rows(csv_text, &mapping("x", "y", Some("mag"))).is_err());
    }

    #[test]
    fn test_no_value_column_requested() {
        let csv_text = "x,y\n1,2\n";
        let rows = parse_rows(csv_text, &mapping("x", "y", None)).unwrap();
        assert_eq!(rows[0].value, None);
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let csv_text = "station,x,y,mag,operator\nA1,1,2,3,kim\n";
        let rows = parse_rows(csv_text, &mapping("x", "y", Some("mag"))).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, Some(3.0));
    }
}
