//! Segment geometry for lines, arrows and stroke hit testing.

use kurbo::{BezPath, Point};

/// Length of each arrowhead barb.
pub const ARROW_HEAD_LENGTH: f64 = 10.0;
/// Angle between the shaft and each barb, in degrees.
pub const ARROW_HEAD_ANGLE: f64 = 30.0;

/// Distance from `point` to the segment `start`..`end`.
pub fn distance_to_segment(point: Point, start: Point, end: Point) -> f64 {
    let line_vec = end - start;
    let point_vec = point - start;
    let len_sq = line_vec.hypot2();
    if len_sq < f64::EPSILON {
        return point_vec.hypot();
    }
    // Project onto the line, clamped to the segment
    let t = (point_vec.dot(line_vec) / len_sq).clamp(0.0, 1.0);
    point.distance(start + line_vec * t)
}

/// Distance from `point` to the polyline through `points`.
///
/// Returns `None` for an empty polyline.
pub fn distance_to_polyline(point: Point, points: &[Point]) -> Option<f64> {
    match points {
        [] => None,
        [single] => Some(point.distance(*single)),
        _ => points
            .windows(2)
            .map(|pair| distance_to_segment(point, pair[0], pair[1]))
            .reduce(f64::min),
    }
}

/// The two barb tips of an arrowhead at `end`, for a shaft from `start`.
///
/// `None` when the shaft has no direction.
pub fn arrow_head(start: Point, end: Point) -> Option<[Point; 2]> {
    if start == end {
        return None;
    }
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let spread = ARROW_HEAD_ANGLE.to_radians();
    let barb = |theta: f64| {
        Point::new(
            end.x - ARROW_HEAD_LENGTH * theta.cos(),
            end.y - ARROW_HEAD_LENGTH * theta.sin(),
        )
    };
    Some([barb(angle - spread), barb(angle + spread)])
}

/// Shaft plus optional arrowhead as an open path.
pub fn segment_path(start: Point, end: Point, with_head: bool) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(start);
    path.line_to(end);
    if with_head {
        if let Some([left, right]) = arrow_head(start, end) {
            path.move_to(end);
            path.line_to(left);
            path.move_to(end);
            path.line_to(right);
        }
    }
    path
}
