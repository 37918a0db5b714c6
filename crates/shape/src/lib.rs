//! # Shape Recognition Library
//!
//! Classifies planar object silhouettes in range-camera amplitude frames.
//!
//! ## Core Features
//!
//! - **Trait-based stages**: preprocessing and hull extraction sit behind
//!   traits so rigs can swap in their own implementations
//! - **Deterministic classifier**: a fixed decision procedure over convex
//!   hulls (partial, circle, triangle, square/rectangle, ellipse, polygons)
//! - **First-match target selection**: the scan stops at the first hull
//!   carrying the requested label
//! - **Audit output**: annotated images and GeoJSON export, both computed
//!   from the structured report after classification
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shape::{ShapeLabel, ShapePipeline};
//!
//! let pipeline = ShapePipeline::builder()
//!     .with_standard_preprocessing()
//!     .build();
//!
//! let frame = image::open("amplitude.png")?.to_luma8();
//! let report = pipeline.classify(&frame, ShapeLabel::Square)?;
//! println!("{:?} at {:?}", report.detected, report.center());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod traits;
pub mod geometry;
pub mod algorithms;
pub mod pipeline;
pub mod render;
pub mod io;

pub use error::{Result, ShapeError};
pub use types::*;
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{ShapePipeline, builder::ShapePipelineBuilder};
pub use render::{load_font, render_annotations};

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Dark frame with bright filled polygons, like an amplitude image of
    /// objects on a matte floor.
    fn create_test_image(width: u32, height: u32, shapes: &[Vec<(f64, f64)>]) -> GrayImage {
        let mut img = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if shapes.iter().any(|s| contains(s, p)) {
                    img.put_pixel(x, y, Luma([230u8]));
                } else {
                    img.put_pixel(x, y, Luma([20u8]));
                }
            }
        }
        img
    }

    /// Even-odd point-in-polygon test
    fn contains(polygon: &[(f64, f64)], (px, py): (f64, f64)) -> bool {
        let mut inside = false;
        let n = polygon.len();
        for i in 0..n {
            let (xi, yi) = polygon[i];
            let (xj, yj) = polygon[(i + n - 1) % n];
            if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
                inside = !inside;
            }
        }
        inside
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Vec<(f64, f64)> {
        vec![(x, y), (x + w, y), (x + w, y + h), (x, y + h)]
    }

    fn disk(cx: f64, cy: f64, r: f64) -> Vec<(f64, f64)> {
        (0..180)
            .map(|i| {
                let t = std::f64::consts::TAU * i as f64 / 180.0;
                (cx + r * t.cos(), cy + r * t.sin())
            })
            .collect()
    }

    fn regular_polygon(sides: usize, radius: f64, rotation: f64) -> Vec<(f64, f64)> {
        (0..sides)
            .map(|i| {
                let t = rotation + std::f64::consts::TAU * i as f64 / sides as f64;
                (100.0 + radius * t.cos(), 100.0 + radius * t.sin())
            })
            .collect()
    }

    #[test]
    fn test_pipeline_labels_rendered_regular_polygons() {
        let pipeline = ShapePipeline::default();
        let cases = [
            (5, ShapeLabel::Pentagon),
            (6, ShapeLabel::Hexagon),
            (7, ShapeLabel::Heptagon),
            (8, ShapeLabel::Octagon),
        ];
        for (sides, expected) in cases {
            for radius in [40.0, 60.0, 80.0] {
                for rotation in [0.0, 0.3] {
                    let image = create_test_image(200, 200, &[regular_polygon(sides, radius, rotation)]);
                    let report = pipeline.classify(&image, ShapeLabel::All).unwrap();
                    assert_eq!(
                        report.detected,
                        vec![expected],
                        "{} sides, r={}, rotation={}",
                        sides,
                        radius,
                        rotation
                    );
                }
            }
        }
    }

    #[test]
    fn test_pipeline_pentagon_with_edge_parallel_to_split_chord() {
        let pipeline = ShapePipeline::default();
        let image = create_test_image(200, 200, &[regular_polygon(5, 40.0, 0.0)]);

        let report = pipeline.classify(&image, ShapeLabel::Pentagon).unwrap();
        assert_eq!(report.last_label(), Some(ShapeLabel::Pentagon));
        assert_eq!(report.contour().vertex_count(), 5);
    }

    #[test]
    fn test_pipeline_finds_square() {
        let pipeline = ShapePipeline::default();
        let image = create_test_image(200, 200, &[rect(70.0, 70.0, 60.0, 60.0)]);

        let report = pipeline
            .classify(&image, ShapeLabel::Square)
            .expect("Should classify successfully");
        assert_eq!(report.last_label(), Some(ShapeLabel::Square));

        let [cx, cy] = report.center().expect("square should be selected");
        assert!((cx - 100.0).abs() < 3.0, "center x {}", cx);
        assert!((cy - 100.0).abs() < 3.0, "center y {}", cy);
        assert_eq!(report.contour().vertex_count(), 4);
    }

    #[test]
    fn test_pipeline_finds_disk() {
        let pipeline = ShapePipeline::default();
        let image = create_test_image(200, 200, &[disk(100.0, 100.0, 50.0)]);

        let report = pipeline.classify(&image, ShapeLabel::Circle).unwrap();
        assert_eq!(report.last_label(), Some(ShapeLabel::Circle));
        assert!(report.selection.is_some());
    }

    #[test]
    fn test_pipeline_finds_triangle() {
        let pipeline = ShapePipeline::default();
        let triangle = vec![(100.0, 40.0), (160.0, 150.0), (40.0, 150.0)];
        let image = create_test_image(200, 200, &[triangle]);

        let report = pipeline.classify(&image, ShapeLabel::Triangle).unwrap();
        assert_eq!(report.last_label(), Some(ShapeLabel::Triangle));
    }

    #[test]
    fn test_pipeline_on_blank_frame() {
        let pipeline = ShapePipeline::default();
        let image = create_test_image(120, 90, &[]);

        let report = pipeline.classify(&image, ShapeLabel::All).unwrap();
        assert!(report.detected.is_empty());
        assert!(report.contour().is_empty());
        assert_eq!((report.image_width, report.image_height), (120, 90));
    }

    #[test]
    fn test_pipeline_rejects_empty_frame() {
        let pipeline = ShapePipeline::default();
        let result = pipeline.classify(&GrayImage::new(0, 0), ShapeLabel::All);
        assert!(matches!(result, Err(ShapeError::EmptyFrame { .. })));
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let pipeline = ShapePipeline::default();
        let image = create_test_image(
            200,
            200,
            &[rect(20.0, 20.0, 50.0, 30.0), disk(140.0, 130.0, 35.0)],
        );

        let first = pipeline.classify(&image, ShapeLabel::All).unwrap();
        let second = pipeline.classify(&image, ShapeLabel::All).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_source_frame_is_not_mutated() {
        let pipeline = ShapePipeline::default();
        let image = create_test_image(200, 200, &[rect(70.0, 70.0, 60.0, 60.0)]);
        let copy = image.clone();
        let _ = pipeline.classify(&image, ShapeLabel::All).unwrap();
        assert_eq!(image, copy);
    }
}
