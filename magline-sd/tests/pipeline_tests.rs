//! End-to-end pipeline tests at the library level
//!
//! Walks the canonical two-point scenario through every pipeline stage and
//! checks the documented properties of each intermediate product, without
//! any HTTP involved.

use magline_common::types::{MeasuredPoint, ValueSource};
use magline_sd::synthesis::{
    build_stations_sparse, generate_targets, merge_rows, order_along_traverse, parameterize,
    predict_rows, split_train_predict, train_rows,
};

fn canonical_points() -> Vec<MeasuredPoint> {
    vec![
        MeasuredPoint {
            x: 10.0,
            y: 0.0,
            value: 20.0,
        },
        MeasuredPoint {
            x: 0.0,
            y: 0.0,
            value: 10.0,
        },
    ]
}

#[test]
fn test_canonical_two_point_scenario() {
    // Measured points (0,0,10) and (10,0,20) at spacing 5: ordered by x,
    // d_along = [0, 10], targets at d = 0, 5, 10.
    let ordered = order_along_traverse(canonical_points());
    assert_eq!(ordered[0].x, 0.0);
    assert_eq!(ordered[1].x, 10.0);

    let parameterized = parameterize(&ordered);
    assert_eq!(parameterized[0].d_along, 0.0);
    assert_eq!(parameterized[1].d_along, 10.0);

    let targets = generate_targets(&parameterized, 5.0).unwrap();
    let ds: Vec<f64> = targets.iter().map(|t| t.d_along).collect();
    assert_eq!(ds, vec![0.0, 5.0, 10.0]);

    let stations = build_stations_sparse(canonical_points(), 5.0).unwrap();
    assert!(stations[0].measured);
    assert_eq!(stations[0].value, Some(10.0));
    assert!(!stations[1].measured);
    assert_eq!(stations[1].x, 5.0);
    assert_eq!(stations[1].y, 0.0);
    assert!(stations[2].measured);
    assert_eq!(stations[2].value, Some(20.0));

    let (train_stations, predict_stations) = split_train_predict(&stations);
    assert_eq!(train_stations.len(), 2);
    assert_eq!(predict_stations.len(), 1);
}

#[test]
fn test_round_trip_with_perfect_predictions() {
    // If the predictions equal the values a real survey would have
    // measured, the merged output is the densified truth: ordered by
    // d_along with sources labeling provenance.
    let stations = build_stations_sparse(canonical_points(), 5.0).unwrap();
    let train = train_rows(&stations);
    let predict = predict_rows(&stations);

    let truth: Vec<f64> = predict.iter().map(|p| 10.0 + p.d_along).collect();
    let merged = merge_rows(&train, &predict, &truth).unwrap();

    assert_eq!(merged.len(), train.len() + predict.len());
    for w in merged.windows(2) {
        assert!(w[0].d_along <= w[1].d_along);
    }
    for row in &merged {
        match row.source {
            ValueSource::Measured => assert!(row.value == 10.0 || row.value == 20.0),
            ValueSource::Predicted => assert_eq!(row.value, 10.0 + row.d_along),
        }
    }
}

#[test]
fn test_mismatched_prediction_count_produces_nothing() {
    // Predict row count 3, predictions list length 2: the merge must fail
    // and no output may exist.
    let stations = build_stations_sparse(
        vec![
            MeasuredPoint {
                x: 0.0,
                y: 0.0,
                value: 1.0,
            },
            MeasuredPoint {
                x: 20.0,
                y: 0.0,
                value: 2.0,
            },
        ],
        5.0,
    )
    .unwrap();
    let train = train_rows(&stations);
    let predict = predict_rows(&stations);
    assert_eq!(predict.len(), 3);

    assert!(merge_rows(&train, &predict, &[1.0, 2.0]).is_err());
}

#[test]
fn test_uneven_spacing_still_ends_on_the_last_point() {
    // 7 does not divide 10: targets at 0 and 7, then the exact endpoint.
    let stations = build_stations_sparse(canonical_points(), 7.0).unwrap();

    let last = stations.last().unwrap();
    assert_eq!(last.d_along, 10.0);
    assert_eq!(last.x, 10.0);
    assert!(last.measured);

    let ds: Vec<f64> = stations.iter().map(|s| s.d_along).collect();
    assert_eq!(ds, vec![0.0, 7.0, 10.0]);
}
