use std::f64::consts::PI;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    geometry::{approximate_closed_polygon, fit_ellipse, min_area_rect, min_enclosing_circle},
    types::{ApproxPolygon, ClassifiedHull, Hull, ShapeLabel},
};

/// Thresholds of the shape decision procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ClassifierParams {
    /// Hulls below this area (px²) are noise
    pub min_area: f64,
    /// Hulls with area ≥ width·height − margin are background
    pub max_area_margin: f64,
    /// Approximation tolerance as a fraction of the hull perimeter
    pub approx_epsilon_ratio: f64,
    /// Radius shrink applied to the enclosing circle before comparing areas
    pub circle_radius_erosion: f64,
    pub square_aspect_min: f64,
    pub square_aspect_max: f64,
    /// Allowed excess of the fitted ellipse area over the hull area (px²)
    pub ellipse_area_slack: f64,
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            min_area: 200.0,
            max_area_margin: 2000.0,
            approx_epsilon_ratio: 0.04,
            circle_radius_erosion: 1.0,
            square_aspect_min: 0.9,
            square_aspect_max: 1.1,
            ellipse_area_slack: 100.0,
        }
    }
}

/// Assigns a [`ShapeLabel`] to each hull with a fixed decision order:
/// area filter, approximation, partial check, circle check, then the
/// vertex-count branches.
#[derive(Debug, Clone, Default)]
pub struct ShapeClassifier {
    pub params: ClassifierParams,
}

impl ShapeClassifier {
    pub fn new(params: ClassifierParams) -> Self {
        Self { params }
    }

    /// Classify a single hull, or `None` when the area filter rejects it.
    pub fn classify(&self, hull: &Hull, width: u32, height: u32) -> Option<ClassifiedHull> {
        let area = hull.area();
        let max_area = (width as f64 * height as f64) - self.params.max_area_margin;
        if area < self.params.min_area || area >= max_area {
            return None;
        }

        let epsilon = self.params.approx_epsilon_ratio * hull.perimeter();
        let approx = ApproxPolygon::new(approximate_closed_polygon(&hull.points, epsilon));

        let label = if touches_border(&approx, width, height) {
            ShapeLabel::Partial
        } else {
            self.label_whole_shape(hull, &approx, area)
        };
        debug!(%label, area, vertices = approx.vertex_count(), "Classified hull");

        Some(ClassifiedHull {
            hull: hull.clone(),
            approx,
            label,
            area,
        })
    }

    /// Lazily classify hulls in extraction order, skipping filtered ones.
    pub fn classify_all<'a>(
        &'a self,
        hulls: &'a [Hull],
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = ClassifiedHull> + 'a {
        hulls
            .iter()
            .filter_map(move |hull| self.classify(hull, width, height))
    }

    fn label_whole_shape(&self, hull: &Hull, approx: &ApproxPolygon, area: f64) -> ShapeLabel {
        let points = hull.to_f64();

        if let Some(circle) = min_enclosing_circle(&points) {
            let radius = (circle.radius - self.params.circle_radius_erosion).max(0.0);
            if PI * radius * radius <= area {
                return ShapeLabel::Circle;
            }
        }

        match approx.vertex_count() {
            3 => ShapeLabel::Triangle,
            4 => self.square_or_rectangle(&points),
            n if n >= 5 => self.ellipse_or_polygon(&points, n, area),
            _ => ShapeLabel::Unknown,
        }
    }

    fn square_or_rectangle(&self, points: &[[f64; 2]]) -> ShapeLabel {
        let Some(rect) = min_area_rect(points) else {
            return ShapeLabel::Unknown;
        };
        let aspect = rect.aspect_ratio();
        if (self.params.square_aspect_min..=self.params.square_aspect_max).contains(&aspect) {
            ShapeLabel::Square
        } else {
            ShapeLabel::Rectangle
        }
    }

    fn ellipse_or_polygon(&self, points: &[[f64; 2]], vertices: usize, area: f64) -> ShapeLabel {
        let fits_ellipse = fit_ellipse(points)
            .is_some_and(|ellipse| ellipse.area() - self.params.ellipse_area_slack <= area);
        if fits_ellipse {
            return ShapeLabel::Ellipse;
        }
        // Counts above eight that are not elliptical have no polygon label
        ShapeLabel::from_vertex_count(vertices).unwrap_or(ShapeLabel::Unknown)
    }
}

/// Whether any approximated vertex lies on (or one pixel inside) the frame
/// border, meaning the object is cut off.
pub fn touches_border(approx: &ApproxPolygon, width: u32, height: u32) -> bool {
    let (w, h) = (width as i32, height as i32);
    approx
        .vertices
        .iter()
        .any(|&[x, y]| x <= 1 || x >= w - 1 || y <= 1 || y == h || y == h - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: u32 = 300;

    /// Integer vertices of a regular polygon centered in the test frame.
    fn regular_polygon(sides: usize, radius: f64) -> Hull {
        let c = FRAME as f64 / 2.0;
        let points = (0..sides)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / sides as f64 - PI / 2.0;
                [(c + radius * t.cos()).round() as i32, (c + radius * t.sin()).round() as i32]
            })
            .collect();
        Hull::new(points)
    }

    fn rectangle(x: i32, y: i32, w: i32, h: i32) -> Hull {
        Hull::new(vec![[x, y], [x + w, y], [x + w, y + h], [x, y + h]])
    }

    fn label_of(hull: &Hull) -> ShapeLabel {
        ShapeClassifier::default()
            .classify(hull, FRAME, FRAME)
            .expect("hull should pass the area filter")
            .label
    }

    #[test]
    fn test_regular_polygons() {
        let cases = [
            (3, ShapeLabel::Triangle),
            (5, ShapeLabel::Pentagon),
            (6, ShapeLabel::Hexagon),
            (7, ShapeLabel::Heptagon),
            (8, ShapeLabel::Octagon),
        ];
        for (sides, expected) in cases {
            let label = label_of(&regular_polygon(sides, 80.0));
            assert_eq!(label, expected, "{} sides", sides);
        }
    }

    #[test]
    fn test_dense_circle_is_circle() {
        let label = label_of(&regular_polygon(64, 60.0));
        assert_eq!(label, ShapeLabel::Circle);
    }

    #[test]
    fn test_dense_ellipse_is_ellipse() {
        let c = FRAME as f64 / 2.0;
        let points = (0..120)
            .map(|i| {
                let t = 2.0 * PI * i as f64 / 120.0;
                [(c + 90.0 * t.cos()).round() as i32, (c + 60.0 * t.sin()).round() as i32]
            })
            .collect();
        assert_eq!(label_of(&Hull::new(points)), ShapeLabel::Ellipse);
    }

    #[test]
    fn test_square_rectangle_thresholds() {
        assert_eq!(label_of(&rectangle(100, 100, 100, 100)), ShapeLabel::Square);
        assert_eq!(label_of(&rectangle(100, 100, 100, 109)), ShapeLabel::Square);
        assert_eq!(label_of(&rectangle(100, 100, 100, 111)), ShapeLabel::Rectangle);
        assert_eq!(label_of(&rectangle(50, 100, 200, 100)), ShapeLabel::Rectangle);
    }

    #[test]
    fn test_border_contact_is_partial() {
        let triangle = Hull::new(vec![[0, 150], [120, 60], [120, 240]]);
        assert_eq!(label_of(&triangle), ShapeLabel::Partial);

        let right_edge = Hull::new(vec![[180, 60], [FRAME as i32 - 1, 150], [180, 240]]);
        assert_eq!(label_of(&right_edge), ShapeLabel::Partial);

        let bottom_edge = rectangle(100, 200, 60, FRAME as i32 - 1 - 200);
        assert_eq!(label_of(&bottom_edge), ShapeLabel::Partial);
    }

    #[test]
    fn test_area_filter() {
        let classifier = ShapeClassifier::default();
        assert!(classifier.classify(&rectangle(10, 10, 10, 10), FRAME, FRAME).is_none());
        let background = rectangle(0, 0, FRAME as i32 - 1, FRAME as i32 - 1);
        assert!(classifier.classify(&background, FRAME, FRAME).is_none());
    }

    #[test]
    fn test_classify_all_preserves_order() {
        let hulls = vec![
            regular_polygon(3, 80.0),
            rectangle(5, 5, 5, 5),
            rectangle(100, 100, 100, 100),
        ];
        let classifier = ShapeClassifier::default();
        let labels: Vec<ShapeLabel> = classifier
            .classify_all(&hulls, FRAME, FRAME)
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec![ShapeLabel::Triangle, ShapeLabel::Square]);
    }
}
