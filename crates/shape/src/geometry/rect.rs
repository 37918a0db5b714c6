use geo::{BoundingRect, MinimumRotatedRect};
use geo_types::{Coord, MultiPoint, Point};

use crate::types::OrientedBox;

/// Minimum-area rectangle enclosing `points`.
///
/// The angle follows the `[-90, 0)` degree convention: the reported width is
/// the edge whose direction falls in that range. Degenerate inputs (fewer than
/// three non-collinear points) fall back to the axis-aligned bounding box.
pub fn min_area_rect(points: &[[f64; 2]]) -> Option<OrientedBox> {
    if points.is_empty() {
        return None;
    }
    let multi: MultiPoint<f64> = points
        .iter()
        .map(|&[x, y]| Point::new(x, y))
        .collect::<Vec<_>>()
        .into();

    if let Some(rect) = multi.minimum_rotated_rect() {
        let corners: Vec<Coord<f64>> = rect.exterior().coords().copied().collect();
        if corners.len() >= 4 {
            return Some(from_corners(corners[0], corners[1], corners[2]));
        }
    }

    let bounds = multi.bounding_rect()?;
    Some(OrientedBox {
        center: [bounds.center().x, bounds.center().y],
        size: [bounds.width(), bounds.height()],
        angle: -90.0,
    })
}

/// Build the box from three consecutive corners.
fn from_corners(p0: Coord<f64>, p1: Coord<f64>, p2: Coord<f64>) -> OrientedBox {
    let e1 = p1 - p0;
    let e2 = p2 - p1;
    let mut width = e1.x.hypot(e1.y);
    let mut height = e2.x.hypot(e2.y);
    let mut angle = snap(e1.y.atan2(e1.x).to_degrees());

    // Each quarter turn swaps which edge is reported as the width
    while angle >= 0.0 {
        angle -= 90.0;
        std::mem::swap(&mut width, &mut height);
    }
    while angle < -90.0 {
        angle += 90.0;
        std::mem::swap(&mut width, &mut height);
    }

    let center = [(p0.x + p2.x) / 2.0, (p0.y + p2.y) / 2.0];
    OrientedBox {
        center,
        size: [width, height],
        angle,
    }
}

/// Remove floating-point noise around multiples of 90 degrees.
fn snap(angle: f64) -> f64 {
    let nearest = (angle / 90.0).round() * 90.0;
    if (angle - nearest).abs() < 1e-9 { nearest } else { angle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_aligned_rectangle() {
        let pts = [[10.0, 10.0], [70.0, 10.0], [70.0, 40.0], [10.0, 40.0]];
        let obb = min_area_rect(&pts).unwrap();
        assert_relative_eq!(obb.center[0], 40.0, epsilon = 1e-6);
        assert_relative_eq!(obb.center[1], 25.0, epsilon = 1e-6);
        assert_relative_eq!(obb.long_side(), 60.0, epsilon = 1e-6);
        assert_relative_eq!(obb.short_side(), 30.0, epsilon = 1e-6);
        assert!(obb.angle >= -90.0 && obb.angle < 0.0);
    }

    #[test]
    fn test_rotated_square() {
        // Diamond: a square of side 20√2 rotated by 45 degrees
        let pts = [[50.0, 30.0], [70.0, 50.0], [50.0, 70.0], [30.0, 50.0]];
        let obb = min_area_rect(&pts).unwrap();
        assert_relative_eq!(obb.width(), 800f64.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(obb.height(), 800f64.sqrt(), epsilon = 1e-6);
        assert_relative_eq!(obb.angle, -45.0, epsilon = 1e-6);
        assert_relative_eq!(obb.center[0], 50.0, epsilon = 1e-6);
        assert_relative_eq!(obb.center[1], 50.0, epsilon = 1e-6);
    }

    #[test]
    fn test_single_point_falls_back_to_bounds() {
        let obb = min_area_rect(&[[5.0, 7.0]]).unwrap();
        assert_relative_eq!(obb.area(), 0.0);
        assert_relative_eq!(obb.center[0], 5.0);
    }
}
