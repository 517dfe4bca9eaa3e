use nalgebra::{Point2, Rotation2, Vector2};

/// Unit vector pointing at `angle` radians from the +x axis.
pub fn direction(angle: f64) -> Vector2<f64> {
    Rotation2::new(angle) * Vector2::x()
}

/// Angle of a vector in radians, measured from the +x axis in `(-π, π]`.
pub fn angle_of(v: &Vector2<f64>) -> f64 {
    v.y.atan2(v.x)
}

/// Deterministic unit vector used to separate two coincident points.
pub fn separation_direction(i: usize, j: usize) -> Vector2<f64> {
    // Golden angle spreads consecutive pairs far apart on the circle.
    let golden_angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    direction((i * 31 + j) as f64 * golden_angle)
}

/// Axis-aligned bounding box as `(min, max)` corners.
pub fn bounding_box(points: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let first = points.first()?;
    Some(points.iter().skip(1).fold((*first, *first), |(min, max), p| {
        (
            Point2::new(min.x.min(p.x), min.y.min(p.y)),
            Point2::new(max.x.max(p.x), max.y.max(p.y)),
        )
    }))
}

pub fn translate(points: &mut [Point2<f64>], offset: &Vector2<f64>) {
    for p in points.iter_mut() {
        *p += *offset;
    }
}

pub fn min_pairwise_distance(a: &[Point2<f64>], b: &[Point2<f64>]) -> Option<f64> {
    a.iter()
        .flat_map(|p| b.iter().map(move |q| (p - q).norm()))
        .min_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-12;

    #[test]
    fn direction_is_unit_and_points_at_angle() {
        let d = direction(FRAC_PI_2);
        assert!((d.norm() - 1.0).abs() < EPS);
        assert!(d.x.abs() < EPS);
        assert!((d.y - 1.0).abs() < EPS);
    }

    #[test]
    fn angle_of_inverts_direction() {
        for angle in [0.0, 0.5, FRAC_PI_2, 2.0, -1.0, -2.5] {
            assert!((angle_of(&direction(angle)) - angle).abs() < 1e-9);
        }
        assert!((angle_of(&Vector2::new(-1.0, 0.0)) - PI).abs() < EPS);
    }

    #[test]
    fn separation_direction_is_unit_and_deterministic() {
        let a = separation_direction(3, 7);
        let b = separation_direction(3, 7);
        assert_eq!(a, b);
        assert!((a.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_spans_all_points() {
        let points = [
            Point2::new(1.0, -2.0),
            Point2::new(-3.0, 5.0),
            Point2::new(0.0, 0.0),
        ];
        assert_eq!(
            bounding_box(&points),
            Some((Point2::new(-3.0, -2.0), Point2::new(1.0, 5.0)))
        );
        assert_eq!(bounding_box(&[]), None);
    }

    #[test]
    fn translate_moves_every_point() {
        let mut points = [Point2::new(1.0, 1.0), Point2::new(-1.0, 0.0)];
        translate(&mut points, &Vector2::new(2.0, -1.0));
        assert_eq!(points, [Point2::new(3.0, 0.0), Point2::new(1.0, -1.0)]);
    }

    #[test]
    fn min_pairwise_distance_finds_closest_pair() {
        let a = [Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)];
        let b = [Point2::new(13.0, 4.0), Point2::new(100.0, 0.0)];
        assert_eq!(min_pairwise_distance(&a, &b), Some(5.0));
        assert_eq!(min_pairwise_distance(&a, &[]), None);
    }
}
