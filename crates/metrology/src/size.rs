use image::{GrayImage, ImageBuffer, Luma};
use imageproc::distance_transform::Norm;
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shape::{ApproxPolygon, geometry::min_area_rect};
use tracing::{debug, info};

use crate::error::{MetrologyError, Result};

/// Per-pixel range to the imaged surface, in metres
pub type DistanceImage = ImageBuffer<Luma<f32>, Vec<f32>>;

const FILL: Luma<u8> = Luma([255]);

/// Camera and sampling constants for size estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MetrologyParams {
    /// Horizontal field of view of the range camera, in degrees
    pub horizontal_fov_deg: f64,
    /// Growth of the bounding-box mask before the object is cut out (px)
    pub box_dilation: u8,
    /// Growth of the object mask before it is cut out of the box (px)
    pub object_dilation: u8,
}

impl Default for MetrologyParams {
    fn default() -> Self {
        Self {
            horizontal_fov_deg: 40.0,
            box_dilation: 10,
            object_dilation: 2,
        }
    }
}

/// Object dimensions in metres. `length >= width` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SizeEstimate {
    pub height: f64,
    pub length: f64,
    pub width: f64,
}

/// Measures a selected contour against its co-registered distance frame.
#[derive(Debug, Clone, Default)]
pub struct SizeEstimator {
    pub params: MetrologyParams,
}

impl SizeEstimator {
    pub fn new(params: MetrologyParams) -> Self {
        Self { params }
    }

    pub fn estimate(&self, contour: &ApproxPolygon, distance: &DistanceImage) -> Result<SizeEstimate> {
        if contour.is_empty() {
            return Err(MetrologyError::EmptyContour);
        }
        let height = self.height(contour, distance)?;
        let (length, width) = self.length_width(contour, distance)?;

        let estimate = SizeEstimate { height, length, width };
        info!(?estimate, "Estimated object size");
        Ok(estimate)
    }

    /// Floor distance minus object distance.
    ///
    /// The object distance is the mean over the filled contour. The floor
    /// distance is the mean over an annulus: the dilated bounding box of the
    /// contour minus the dilated object mask.
    pub fn height(&self, contour: &ApproxPolygon, distance: &DistanceImage) -> Result<f64> {
        if contour.is_empty() {
            return Err(MetrologyError::EmptyContour);
        }
        let (width, height) = distance.dimensions();

        let object_mask = fill_polygon(&contour.vertices, width, height);
        let object = masked_mean(distance, &object_mask)
            .ok_or(MetrologyError::EmptyRegion { region: "object" })?;

        let points: Vec<[f64; 2]> = contour
            .vertices
            .iter()
            .map(|&[x, y]| [x as f64, y as f64])
            .collect();
        let rect = min_area_rect(&points).ok_or(MetrologyError::EmptyContour)?;
        let box_vertices: Vec<[i32; 2]> = rect
            .corners()
            .iter()
            .map(|&[x, y]| [x.round() as i32, y.round() as i32])
            .collect();

        let box_mask = imageproc::morphology::dilate(
            &fill_polygon(&box_vertices, width, height),
            Norm::LInf,
            self.params.box_dilation,
        );
        let object_grown =
            imageproc::morphology::dilate(&object_mask, Norm::LInf, self.params.object_dilation);
        let floor_mask = GrayImage::from_fn(width, height, |x, y| {
            if box_mask.get_pixel(x, y)[0] > 0 && object_grown.get_pixel(x, y)[0] == 0 {
                FILL
            } else {
                Luma([0])
            }
        });
        let floor = masked_mean(distance, &floor_mask)
            .ok_or(MetrologyError::EmptyRegion { region: "floor" })?;

        debug!(object, floor, "Mean distances");
        Ok(floor - object)
    }

    /// Long and short side of the contour's oriented box, in metres
    pub fn length_width(&self, contour: &ApproxPolygon, distance: &DistanceImage) -> Result<(f64, f64)> {
        let points: Vec<[f64; 2]> = contour
            .vertices
            .iter()
            .map(|&[x, y]| [x as f64, y as f64])
            .collect();
        let rect = min_area_rect(&points).ok_or(MetrologyError::EmptyContour)?;
        let pixel_size = self.pixel_size(distance)?;
        Ok((rect.long_side() * pixel_size, rect.short_side() * pixel_size))
    }

    /// Metres per pixel along the image x axis.
    ///
    /// The ranges at both ends of the first row and the field of view form a
    /// triangle; the law of cosines gives the floor span it covers.
    pub fn pixel_size(&self, distance: &DistanceImage) -> Result<f64> {
        let (width, height) = distance.dimensions();
        if width == 0 || height == 0 {
            return Err(MetrologyError::EmptyImage { width, height });
        }
        let a = distance.get_pixel(0, 0)[0] as f64;
        let b = distance.get_pixel(width - 1, 0)[0] as f64;
        let fov = self.params.horizontal_fov_deg.to_radians();
        let span = (a * a + b * b - 2.0 * a * b * fov.cos()).sqrt();
        Ok(span / width as f64)
    }
}

/// Filled polygon mask, boundary included.
pub fn fill_polygon(vertices: &[[i32; 2]], width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);

    let mut points: Vec<Point<i32>> = Vec::with_capacity(vertices.len());
    for &[x, y] in vertices {
        let p = Point::new(x, y);
        if points.last() != Some(&p) {
            points.push(p);
        }
    }
    // Drawing requires an open ring
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    match points.as_slice() {
        [] => {}
        [p] => {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
                mask.put_pixel(p.x as u32, p.y as u32, FILL);
            }
        }
        [a, b] => draw_line_segment_mut(
            &mut mask,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            FILL,
        ),
        _ => draw_polygon_mut(&mut mask, &points, FILL),
    }
    mask
}

fn masked_mean(distance: &DistanceImage, mask: &GrayImage) -> Option<f64> {
    let (sum, count) = distance
        .pixels()
        .zip(mask.pixels())
        .filter(|(_, m)| m[0] > 0)
        .fold((0.0f64, 0usize), |(sum, count), (d, _)| (sum + d[0] as f64, count + 1));
    (count > 0).then(|| sum / count as f64)
}
