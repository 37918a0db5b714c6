use geo_types::{Coord, LineString, Polygon};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};

/// Shape labels produced by the classifier.
///
/// `All` is a wildcard target; `Partial` and `Unknown` are fallback labels
/// that never denote a graspable object.
#[derive(
    Debug, Clone, Copy,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq, Eq, Hash
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum ShapeLabel {
    All,
    Circle,
    Ellipse,
    Triangle,
    Square,
    Rectangle,
    Pentagon,
    Hexagon,
    Heptagon,
    Octagon,
    Partial,
    Unknown,
}

impl ShapeLabel {
    /// Whether a match against this label yields a pose worth grasping.
    pub fn is_physical(self) -> bool {
        !matches!(self, Self::All | Self::Partial | Self::Unknown)
    }

    /// Regular polygon label for a vertex count, if there is one.
    pub fn from_vertex_count(count: usize) -> Option<Self> {
        match count {
            3 => Some(Self::Triangle),
            5 => Some(Self::Pentagon),
            6 => Some(Self::Hexagon),
            7 => Some(Self::Heptagon),
            8 => Some(Self::Octagon),
            _ => None,
        }
    }
}

/// Convex hull of an extracted contour, in integer pixel coordinates.
/// The ring is stored open (the first point is not repeated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    pub points: Vec<[i32; 2]>,
}

impl Hull {
    pub fn new(points: Vec<[i32; 2]>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Points as floating-point pairs for the geometry routines.
    pub fn to_f64(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|&[x, y]| [x as f64, y as f64])
            .collect()
    }

    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        to_geo_polygon(&self.points)
    }

    /// Enclosed area in square pixels (shoelace).
    pub fn area(&self) -> f64 {
        use geo::Area;
        self.to_geo_polygon().unsigned_area()
    }

    /// Closed perimeter length in pixels.
    pub fn perimeter(&self) -> f64 {
        use geo::EuclideanLength;
        self.to_geo_polygon().exterior().euclidean_length()
    }
}

/// Reduced-vertex approximation of a hull. Vertex count drives classification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApproxPolygon {
    pub vertices: Vec<[i32; 2]>,
}

impl ApproxPolygon {
    pub fn new(vertices: Vec<[i32; 2]>) -> Self {
        Self { vertices }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        to_geo_polygon(&self.vertices)
    }
}

fn to_geo_polygon(points: &[[i32; 2]]) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = points
        .iter()
        .map(|&[x, y]| Coord { x: x as f64, y: y as f64 })
        .collect();
    // LineString is closed by Polygon::new
    Polygon::new(LineString::new(coords), vec![])
}

/// Minimum-area bounding rectangle.
///
/// `angle` is in degrees within `[-90, 0)`, measured from the image x axis to
/// the edge reported as `size[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedBox {
    pub center: [f64; 2],
    pub size: [f64; 2],
    pub angle: f64,
}

impl OrientedBox {
    pub fn width(&self) -> f64 {
        self.size[0]
    }

    pub fn height(&self) -> f64 {
        self.size[1]
    }

    pub fn long_side(&self) -> f64 {
        self.size[0].max(self.size[1])
    }

    pub fn short_side(&self) -> f64 {
        self.size[0].min(self.size[1])
    }

    /// Long side over short side; `f64::INFINITY` for a degenerate box.
    pub fn aspect_ratio(&self) -> f64 {
        let short = self.short_side();
        if short <= 0.0 {
            return f64::INFINITY;
        }
        self.long_side() / short
    }

    pub fn area(&self) -> f64 {
        self.size[0] * self.size[1]
    }

    /// Corner positions, counter-clockwise starting from the corner the
    /// `size[0]` edge leaves from.
    pub fn corners(&self) -> [[f64; 2]; 4] {
        let (sin, cos) = self.angle.to_radians().sin_cos();
        let (hw, hh) = (self.size[0] / 2.0, self.size[1] / 2.0);
        let [cx, cy] = self.center;
        let local = [[-hw, -hh], [hw, -hh], [hw, hh], [-hw, hh]];
        local.map(|[lx, ly]| [cx + lx * cos - ly * sin, cy + lx * sin + ly * cos])
    }
}

/// A hull that survived area filtering, with its approximation and label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedHull {
    pub hull: Hull,
    pub approx: ApproxPolygon,
    pub label: ShapeLabel,
    pub area: f64,
}

/// The canonical contour and pose of the matched target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSelection {
    pub contour: ApproxPolygon,
    pub pose: OrientedBox,
}

impl TargetSelection {
    pub fn center(&self) -> [f64; 2] {
        self.pose.center
    }

    pub fn angle(&self) -> f64 {
        self.pose.angle
    }
}

/// Result of one classification pass over a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub image_width: u32,
    pub image_height: u32,
    /// Requested target label.
    pub target: ShapeLabel,
    /// Labels seen, in scan order, up to and including the match.
    pub detected: Vec<ShapeLabel>,
    /// Every hull that was classified before the scan stopped.
    pub classified: Vec<ClassifiedHull>,
    /// Present only when a physical target label was matched.
    pub selection: Option<TargetSelection>,
}

impl ClassificationReport {
    /// Label of the last hull scanned, if any.
    pub fn last_label(&self) -> Option<ShapeLabel> {
        self.detected.last().copied()
    }

    /// The selected contour, or an empty polygon when nothing was matched.
    pub fn contour(&self) -> ApproxPolygon {
        self.selection
            .as_ref()
            .map(|s| s.contour.clone())
            .unwrap_or_default()
    }

    pub fn center(&self) -> Option<[f64; 2]> {
        self.selection.as_ref().map(TargetSelection::center)
    }

    pub fn angle(&self) -> Option<f64> {
        self.selection.as_ref().map(TargetSelection::angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::str::FromStr;

    #[test]
    fn test_label_parsing_is_case_insensitive() {
        assert_eq!(ShapeLabel::from_str("rectangle").unwrap(), ShapeLabel::Rectangle);
        assert_eq!(ShapeLabel::from_str("HEPTAGON").unwrap(), ShapeLabel::Heptagon);
        assert_eq!(ShapeLabel::Octagon.to_string(), "OCTAGON");
        assert!(ShapeLabel::from_str("blob").is_err());
    }

    #[test]
    fn test_non_physical_labels() {
        assert!(!ShapeLabel::All.is_physical());
        assert!(!ShapeLabel::Partial.is_physical());
        assert!(!ShapeLabel::Unknown.is_physical());
        assert!(ShapeLabel::Circle.is_physical());
    }

    #[test]
    fn test_hull_area_and_perimeter() {
        let hull = Hull::new(vec![[10, 10], [40, 10], [40, 30], [10, 30]]);
        assert_relative_eq!(hull.area(), 600.0);
        assert_relative_eq!(hull.perimeter(), 100.0);
    }

    #[test]
    fn test_oriented_box_corners_axis_aligned() {
        let obb = OrientedBox { center: [50.0, 40.0], size: [20.0, 10.0], angle: 0.0 };
        let corners = obb.corners();
        assert_relative_eq!(corners[0][0], 40.0);
        assert_relative_eq!(corners[0][1], 35.0);
        assert_relative_eq!(corners[2][0], 60.0);
        assert_relative_eq!(corners[2][1], 45.0);
        assert_relative_eq!(obb.aspect_ratio(), 2.0);
    }
}
