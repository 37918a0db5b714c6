use geo::ConvexHull;
use geo_types::{MultiPoint, Point};
use image::GrayImage;
use tracing::debug;

use crate::{error::Result, traits::HullExtractor, types::Hull};

/// Imageproc-based boundary extractor that replaces every contour (outer
/// borders and hole borders alike) with its convex hull.
#[derive(Debug, Clone, Default)]
pub struct ImageprocHullExtractor;

impl HullExtractor for ImageprocHullExtractor {
    fn extract_hulls(&self, mask: &GrayImage) -> Result<Vec<Hull>> {
        let contours = imageproc::contours::find_contours::<i32>(mask);

        let hulls: Vec<Hull> = contours
            .into_iter()
            .filter(|contour| !contour.points.is_empty())
            .map(|contour| convex_hull(contour.points.iter().map(|p| [p.x, p.y])))
            .collect();

        debug!(count = hulls.len(), "Extracted hulls");
        Ok(hulls)
    }
}

/// Convex hull of integer points as an open ring.
pub fn convex_hull(points: impl IntoIterator<Item = [i32; 2]>) -> Hull {
    let multi: MultiPoint<f64> = points
        .into_iter()
        .map(|[x, y]| Point::new(x as f64, y as f64))
        .collect::<Vec<_>>()
        .into();

    let polygon = multi.convex_hull();
    let mut ring: Vec<[i32; 2]> = polygon
        .exterior()
        .coords()
        .map(|c| [c.x.round() as i32, c.y.round() as i32])
        .collect();

    // Drop the closing point
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    Hull::new(ring)
}
