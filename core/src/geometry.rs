//! Float geometry helpers shared by the simulation crates.

use glam::Vec2;

/// Unit vector pointing from `from` toward `to`.
///
/// Returns the zero vector when the two points coincide, so callers never
/// observe NaN components from a zero-length normalization.
#[must_use]
pub fn direction_between(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Facing angle in radians of a movement direction.
#[must_use]
pub fn facing_angle(direction: Vec2) -> f32 {
    direction.y.atan2(direction.x)
}

/// Divides a vector by a scalar, refusing division by exactly zero.
#[must_use]
pub fn checked_div(vector: Vec2, scalar: f32) -> Option<Vec2> {
    if scalar == 0.0 {
        None
    } else {
        Some(vector / scalar)
    }
}

/// Shortest distance from `point` to the segment spanning `start`..`end`.
#[must_use]
pub fn point_segment_distance(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let span = end - start;
    let length_sq = span.length_squared();
    if length_sq == 0.0 {
        return point.distance(start);
    }

    let t = ((point - start).dot(span) / length_sq).clamp(0.0, 1.0);
    point.distance(start + span * t)
}

#[cfg(test)]
mod tests {
    use super::{checked_div, direction_between, facing_angle, point_segment_distance};
    use glam::Vec2;

    #[test]
    fn coincident_points_yield_zero_direction() {
        let point = Vec2::new(4.0, -2.0);
        assert_eq!(direction_between(point, point), Vec2::ZERO);
    }

    #[test]
    fn direction_is_unit_length() {
        let direction = direction_between(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((direction.length() - 1.0).abs() < 1e-6);
        assert!((direction.x - 0.6).abs() < 1e-6);
        assert!((direction.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn facing_angle_matches_axes() {
        assert_eq!(facing_angle(Vec2::new(1.0, 0.0)), 0.0);
        let up = facing_angle(Vec2::new(0.0, 1.0));
        assert!((up - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn division_by_exactly_zero_is_refused() {
        assert_eq!(checked_div(Vec2::new(2.0, 4.0), 0.0), None);
        assert_eq!(
            checked_div(Vec2::new(2.0, 4.0), 2.0),
            Some(Vec2::new(1.0, 2.0))
        );
    }

    #[test]
    fn segment_distance_handles_interior_and_endpoints() {
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(10.0, 0.0);
        assert_eq!(point_segment_distance(Vec2::new(5.0, 3.0), start, end), 3.0);
        assert_eq!(
            point_segment_distance(Vec2::new(-4.0, 0.0), start, end),
            4.0
        );
        assert_eq!(point_segment_distance(Vec2::new(2.0, 0.0), start, start), 2.0);
    }
}
