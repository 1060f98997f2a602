//! Traverse ordering, arclength parameterization, and station generation

use magline_common::types::{MeasuredPoint, ParameterizedPoint};
use magline_common::{Error, Result};

use super::MATCH_TOLERANCE;

/// A target position synthesized along the traverse, prior to classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetStation {
    pub x: f64,
    pub y: f64,
    pub d_along: f64,
}

/// Anything with a 2-D position that can be ordered along a traverse
pub trait TraversePoint {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

impl TraversePoint for MeasuredPoint {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
}

impl TraversePoint for magline_common::types::SurveyRow {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
}

/// Order points along the traverse's dominant direction.
///
/// Uses the bounding-box extent heuristic: sort by x when the x spread is at
/// least the y spread, otherwise by y. The sort is stable, so ties within
/// the chosen axis retain input relative order. Fewer than 2 points are
/// returned as-is.
///
/// This is a heuristic, not a curve fit: traverses that double back or are
/// not monotonic along either axis produce a physically wrong but internally
/// consistent ordering. Accepted behavior.
pub fn order_along_traverse<P: TraversePoint>(mut points: Vec<P>) -> Vec<P> {
    if points.len() < 2 {
        return points;
    }

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in &points {
        min_x = min_x.min(p.x());
        max_x = max_x.max(p.x());
        min_y = min_y.min(p.y());
        max_y = max_y.max(p.y());
    }

    let dx = max_x - min_x;
    let dy = max_y - min_y;

    if dx >= dy {
        points.sort_by(|a, b| a.x().total_cmp(&b.x()));
    } else {
        points.sort_by(|a, b| a.y().total_cmp(&b.y()));
    }
    points
}

/// Annotate an ordered point sequence with `d_along`, the cumulative
/// Euclidean arclength from the first point.
///
/// `d_along` is monotone non-decreasing by construction (segment distances
/// are non-negative) and the first point carries 0. Empty input yields
/// empty output.
pub fn parameterize(points: &[MeasuredPoint]) -> Vec<ParameterizedPoint> {
    let mut out = Vec::with_capacity(points.len());
    let mut d = 0.0;

    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            let prev = &points[i - 1];
            d += (p.x - prev.x).hypot(p.y - prev.y);
        }
        out.push(ParameterizedPoint {
            x: p.x,
            y: p.y,
            value: p.value,
            d_along: d,
        });
    }
    out
}

/// Interpolate a position at `target_d` between two bracketing points.
///
/// Near-zero segments collapse onto the earlier point's coordinates rather
/// than dividing by a near-zero denominator.
fn interpolate_position(
    p1: &ParameterizedPoint,
    p2: &ParameterizedPoint,
    target_d: f64,
) -> (f64, f64) {
    let span = p2.d_along - p1.d_along;
    if span.abs() < MATCH_TOLERANCE {
        return (p1.x, p1.y);
    }

    let ratio = (target_d - p1.d_along) / span;
    (
        p1.x + ratio * (p2.x - p1.x),
        p1.y + ratio * (p2.y - p1.y),
    )
}

/// Generate target stations at `d_along = 0, spacing, 2*spacing, …` over a
/// parameterized ordered sequence, via linear interpolation between the
/// bracketing points.
///
/// The last measured point's exact position always appears as the final
/// target, regardless of whether `spacing` divides the total length evenly.
/// A single input point yields only the trivial station at `d_along = 0`.
pub fn generate_targets(
    points: &[ParameterizedPoint],
    spacing: f64,
) -> Result<Vec<TargetStation>> {
    if !spacing.is_finite() || spacing <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "station spacing must be a positive number, got {}",
            spacing
        )));
    }
    if points.is_empty() {
        return Ok(Vec::new());
    }

    let total_length = points[points.len() - 1].d_along;
    let mut targets = Vec::new();
    let mut current_d = 0.0;
    let mut i = 0;

    while current_d < total_length {
        // Forward-only cursor: O(n) total over all targets.
        while i + 2 < points.len() && points[i + 1].d_along < current_d {
            i += 1;
        }

        let (x, y) = interpolate_position(&points[i], &points[i + 1], current_d);
        targets.push(TargetStation {
            x,
            y,
            d_along: current_d,
        });

        current_d += spacing;
    }

    // Always include the last measured point
    let last = &points[points.len() - 1];
    targets.push(TargetStation {
        x: last.x,
        y: last.y,
        d_along: last.d_along,
    });

    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64, value: f64) -> MeasuredPoint {
        MeasuredPoint { x, y, value }
    }

    #[test]
    fn test_ordering_by_dominant_x_axis() {
        let points = vec![pt(10.0, 1.0, 3.0), pt(0.0, 0.0, 1.0), pt(5.0, 2.0, 2.0)];
        let ordered = order_along_traverse(points);
        let xs: Vec<f64> = ordered.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_ordering_by_dominant_y_axis() {
        let points = vec![pt(1.0, 100.0, 3.0), pt(0.0, 0.0, 1.0), pt(2.0, 50.0, 2.0)];
        let ordered = order_along_traverse(points);
        let ys: Vec<f64> = ordered.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn test_ordering_equal_spread_prefers_x() {
        // dx == dy: x-axis ordering wins the tie
        let points = vec![pt(5.0, 0.0, 2.0), pt(0.0, 5.0, 1.0)];
        let ordered = order_along_traverse(points);
        assert_eq!(ordered[0].x, 0.0);
        assert_eq!(ordered[1].x, 5.0);
    }

    #[test]
    fn test_ordering_is_stable_on_ties() {
        let points = vec![
            pt(1.0, 0.0, 10.0),
            pt(1.0, 0.1, 20.0),
            pt(0.0, 0.2, 30.0),
        ];
        let ordered = order_along_traverse(points);
        // The two x == 1.0 points keep their input relative order
        assert_eq!(ordered[0].value, 30.0);
        assert_eq!(ordered[1].value, 10.0);
        assert_eq!(ordered[2].value, 20.0);
    }

    #[test]
    fn test_ordering_fewer_than_two_points() {
        assert!(order_along_traverse(Vec::<MeasuredPoint>::new()).is_empty());
        let one = order_along_traverse(vec![pt(3.0, 4.0, 5.0)]);
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_parameterize_starts_at_zero_and_is_non_decreasing() {
        let points = vec![pt(0.0, 0.0, 1.0), pt(3.0, 4.0, 2.0), pt(3.0, 4.0, 3.0), pt(6.0, 8.0, 4.0)];
        let parameterized = parameterize(&points);

        assert_eq!(parameterized[0].d_along, 0.0);
        for w in parameterized.windows(2) {
            assert!(w[1].d_along >= w[0].d_along);
        }
        assert!((parameterized[1].d_along - 5.0).abs() < 1e-12);
        assert!((parameterized[3].d_along - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_parameterize_empty() {
        assert!(parameterize(&[]).is_empty());
    }

    #[test]
    fn test_generate_final_target_is_last_point_exactly() {
        // Total length 10, spacing 3: targets at 0, 3, 6, 9, then the last
        // point appended exactly.
        let parameterized = parameterize(&[pt(0.0, 0.0, 1.0), pt(10.0, 0.0, 2.0)]);
        let targets = generate_targets(&parameterized, 3.0).unwrap();

        let last = targets.last().unwrap();
        assert_eq!(last.x, 10.0);
        assert_eq!(last.y, 0.0);
        assert_eq!(last.d_along, 10.0);
        assert_eq!(targets.len(), 5);
    }

    #[test]
    fn test_generate_even_spacing_alignment() {
        // Spacing divides the length evenly: d = 0, 5 from the loop, then
        // the exact endpoint; no duplicate beyond the tolerance story.
        let parameterized = parameterize(&[pt(0.0, 0.0, 10.0), pt(10.0, 0.0, 20.0)]);
        let targets = generate_targets(&parameterized, 5.0).unwrap();

        let ds: Vec<f64> = targets.iter().map(|t| t.d_along).collect();
        assert_eq!(ds, vec![0.0, 5.0, 10.0]);
        assert!((targets[1].x - 5.0).abs() < 1e-12);
        assert_eq!(targets[1].y, 0.0);
    }

    #[test]
    fn test_generate_interpolates_between_brackets() {
        let parameterized = parameterize(&[
            pt(0.0, 0.0, 1.0),
            pt(4.0, 0.0, 2.0),
            pt(4.0, 6.0, 3.0),
        ]);
        let targets = generate_targets(&parameterized, 5.0).unwrap();

        // d = 5 lands one unit up the second segment
        assert!((targets[1].x - 4.0).abs() < 1e-12);
        assert!((targets[1].y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_generate_single_point_yields_trivial_station() {
        let parameterized = parameterize(&[pt(7.0, 8.0, 9.0)]);
        let targets = generate_targets(&parameterized, 5.0).unwrap();

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].d_along, 0.0);
        assert_eq!(targets[0].x, 7.0);
        assert_eq!(targets[0].y, 8.0);
    }

    #[test]
    fn test_generate_rejects_non_positive_spacing() {
        let parameterized = parameterize(&[pt(0.0, 0.0, 1.0), pt(10.0, 0.0, 2.0)]);
        assert!(generate_targets(&parameterized, 0.0).is_err());
        assert!(generate_targets(&parameterized, -2.5).is_err());
        assert!(generate_targets(&parameterized, f64::NAN).is_err());
    }

    #[test]
    fn test_generate_empty_input() {
        assert!(generate_targets(&[], 5.0).unwrap().is_empty());
    }

    #[test]
    fn test_degenerate_segment_falls_back_to_earlier_point() {
        // Duplicate point creates a zero-length bracketing segment; the
        // generated target collapses onto the earlier point instead of
        // dividing by zero.
        let p1 = ParameterizedPoint {
            x: 1.0,
            y: 2.0,
            value: 0.0,
            d_along: 5.0,
        };
        let p2 = ParameterizedPoint {
            x: 1.0,
            y: 2.0,
            value: 0.0,
            d_along: 5.0,
        };
        let (x, y) = super::interpolate_position(&p1, &p2, 5.0);
        assert_eq!((x, y), (1.0, 2.0));
    }
}
