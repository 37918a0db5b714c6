use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;

use crate::{error::Result, types::ClassificationReport};

fn closed_ring(points: &[[i32; 2]]) -> Vec<Vec<f64>> {
    let mut ring: Vec<Vec<f64>> = points
        .iter()
        .map(|&[x, y]| vec![x as f64, y as f64])
        .collect();
    if let Some(first) = ring.first().cloned() {
        ring.push(first);
    }
    ring
}

impl ClassificationReport {
    /// Export every classified hull's approximation as a Polygon feature.
    ///
    /// Feature properties carry `label`, `area`, `vertex_count` and whether
    /// the hull is the selected target; the collection's foreign members
    /// carry the frame size, the target and the detected label list.
    pub fn to_geojson(&self) -> Result<FeatureCollection> {
        let selected = self.selection.as_ref().map(|s| &s.contour);

        let features = self
            .classified
            .iter()
            .enumerate()
            .map(|(i, hull)| {
                let mut properties = JsonObject::new();
                properties.insert("label".to_string(), json!(hull.label));
                properties.insert("area".to_string(), json!(hull.area));
                properties.insert("vertex_count".to_string(), json!(hull.approx.vertex_count()));
                properties.insert(
                    "selected".to_string(),
                    json!(selected == Some(&hull.approx)),
                );

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(Value::Polygon(vec![closed_ring(
                        &hull.approx.vertices,
                    )]))),
                    id: Some(geojson::feature::Id::Number(i.into())),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        let mut foreign_members = JsonObject::new();
        foreign_members.insert("image_width".to_string(), json!(self.image_width));
        foreign_members.insert("image_height".to_string(), json!(self.image_height));
        foreign_members.insert("target".to_string(), json!(self.target));
        foreign_members.insert("detected".to_string(), serde_json::to_value(&self.detected)?);

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        })
    }

    /// Export to GeoJSON and serialize to a JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        let geojson = self.to_geojson()?;
        Ok(serde_json::to_string_pretty(&geojson)?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::types::*;

    fn report() -> ClassificationReport {
        let square = vec![[10, 10], [40, 10], [40, 40], [10, 40]];
        let classified = ClassifiedHull {
            hull: Hull::new(square.clone()),
            approx: ApproxPolygon::new(square.clone()),
            label: ShapeLabel::Square,
            area: 900.0,
        };
        ClassificationReport {
            image_width: 64,
            image_height: 48,
            target: ShapeLabel::Square,
            detected: vec![ShapeLabel::Square],
            classified: vec![classified],
            selection: Some(TargetSelection {
                contour: ApproxPolygon::new(square),
                pose: OrientedBox { center: [25.0, 25.0], size: [30.0, 30.0], angle: -90.0 },
            }),
        }
    }

    #[test]
    fn test_geojson_export() {
        let geojson = report().to_geojson().unwrap();
        assert_eq!(geojson.features.len(), 1);

        let feature = &geojson.features[0];
        let props = feature.properties.as_ref().unwrap();
        assert_eq!(props["label"], "SQUARE");
        assert_eq!(props["vertex_count"], 4);
        assert_eq!(props["selected"], true);

        match &feature.geometry.as_ref().unwrap().value {
            geojson::Value::Polygon(rings) => {
                assert_eq!(rings[0].len(), 5);
                assert_eq!(rings[0].first(), rings[0].last());
            }
            other => panic!("unexpected geometry {:?}", other),
        }

        let members = geojson.foreign_members.as_ref().unwrap();
        assert_eq!(members["image_width"], 64);
        assert_eq!(members["target"], "SQUARE");
    }

    #[test]
    fn test_geojson_string_parses_back() {
        let text = report().to_geojson_string().unwrap();
        let parsed: geojson::GeoJson = text.parse().unwrap();
        assert!(matches!(parsed, geojson::GeoJson::FeatureCollection(_)));
    }
}
