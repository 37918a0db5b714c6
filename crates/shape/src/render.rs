//! Optional audit rendering, run after classification on its results.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_line_segment_mut, draw_text_mut};

use crate::{
    error::{Result, ShapeError},
    types::{ClassificationReport, ShapeLabel},
};

const HULL_COLOUR: Rgb<u8> = Rgb([0, 200, 0]);
const PARTIAL_COLOUR: Rgb<u8> = Rgb([200, 160, 0]);
const TARGET_COLOUR: Rgb<u8> = Rgb([220, 0, 0]);
const LABEL_COLOUR: Rgb<u8> = Rgb([255, 255, 255]);
const LABEL_SCALE: f32 = 14.0;

/// Load a TrueType/OpenType font for label text.
pub fn load_font(path: impl AsRef<Path>) -> Result<FontVec> {
    let data = std::fs::read(path)?;
    FontVec::try_from_vec(data).map_err(|e| ShapeError::Font(e.to_string()))
}

/// Draw classification results over a mask.
///
/// Every classified approximation is outlined; the selected target gets its
/// oriented box and a center cross. Label text is drawn at each hull's first
/// point when a font is supplied.
pub fn render_annotations(
    mask: &GrayImage,
    report: &ClassificationReport,
    font: Option<&FontVec>,
) -> RgbImage {
    let mut canvas = RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
        let v = mask.get_pixel(x, y)[0] / 2;
        Rgb([v, v, v])
    });

    for hull in &report.classified {
        let colour = if hull.label == ShapeLabel::Partial {
            PARTIAL_COLOUR
        } else {
            HULL_COLOUR
        };
        let outline: Vec<(f32, f32)> = hull
            .approx
            .vertices
            .iter()
            .map(|&[x, y]| (x as f32, y as f32))
            .collect();
        draw_closed_polyline(&mut canvas, &outline, colour);

        if let (Some(font), Some(&[x, y])) = (font, hull.hull.points.first()) {
            let text: &'static str = hull.label.into();
            draw_text_mut(&mut canvas, LABEL_COLOUR, x, y, PxScale::from(LABEL_SCALE), font, text);
        }
    }

    if let Some(selection) = &report.selection {
        let corners: Vec<(f32, f32)> = selection
            .pose
            .corners()
            .iter()
            .map(|&[x, y]| (x as f32, y as f32))
            .collect();
        draw_closed_polyline(&mut canvas, &corners, TARGET_COLOUR);

        let [cx, cy] = selection.center();
        draw_cross_mut(&mut canvas, TARGET_COLOUR, cx.round() as i32, cy.round() as i32);
    }

    canvas
}

fn draw_closed_polyline(canvas: &mut RgbImage, points: &[(f32, f32)], colour: Rgb<u8>) {
    if points.len() < 2 {
        return;
    }
    for (i, &start) in points.iter().enumerate() {
        let end = points[(i + 1) % points.len()];
        draw_line_segment_mut(canvas, start, end, colour);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    #[test]
    fn test_render_marks_hull_and_target() {
        let mask = GrayImage::new(60, 60);
        let square = vec![[10, 10], [40, 10], [40, 40], [10, 40]];
        let report = ClassificationReport {
            image_width: 60,
            image_height: 60,
            target: ShapeLabel::Square,
            detected: vec![ShapeLabel::Square],
            classified: vec![ClassifiedHull {
                hull: Hull::new(square.clone()),
                approx: ApproxPolygon::new(square.clone()),
                label: ShapeLabel::Square,
                area: 900.0,
            }],
            selection: Some(TargetSelection {
                contour: ApproxPolygon::new(square),
                pose: OrientedBox { center: [25.0, 25.0], size: [30.0, 30.0], angle: -45.0 },
            }),
        };

        let canvas = render_annotations(&mask, &report, None);
        assert_eq!(canvas.dimensions(), (60, 60));
        assert_eq!(*canvas.get_pixel(25, 10), HULL_COLOUR);
        assert_eq!(*canvas.get_pixel(25, 25), TARGET_COLOUR);
        assert_eq!(*canvas.get_pixel(2, 2), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_load_font_rejects_garbage() {
        let path = std::env::temp_dir().join("shape_render_not_a_font.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();
        assert!(matches!(load_font(&path), Err(ShapeError::Font(_))));
        let _ = std::fs::remove_file(&path);
    }
}
