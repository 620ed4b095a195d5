//! GeoJSON output.
//!
//! The finished trail is published as a `FeatureCollection` holding a single
//! `LineString` feature with `[longitude, latitude]` coordinates and a `name`
//! property.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry};
use serde_json::{json, Map};

use crate::geo_utils::to_line_string;
use crate::{GpsPoint, Result};

/// Default feature name.
pub const DEFAULT_TRAIL_NAME: &str = "Appalachian Trail";

/// Wrap `points` into a single-feature collection named `name`.
pub fn to_feature_collection(points: &[GpsPoint], name: &str) -> FeatureCollection {
    let line = to_line_string(points);
    let geometry = Geometry::from(&line);

    let mut properties = Map::new();
    properties.insert("name".to_string(), json!(name));

    let feature = Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    };

    FeatureCollection {
        bbox: None,
        features: vec![feature],
        foreign_members: None,
    }
}

/// Serialize the trail as pretty-printed GeoJSON (two-space indent).
pub fn to_geojson_string(points: &[GpsPoint], name: &str) -> Result<String> {
    let geojson = GeoJson::FeatureCollection(to_feature_collection(points, name));
    Ok(serde_json::to_string_pretty(&geojson)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample() -> Vec<GpsPoint> {
        vec![
            GpsPoint::new(34.6295, -84.1927),
            GpsPoint::new(34.64, -84.18),
            GpsPoint::new(45.904362, -68.921274),
        ]
    }

    #[test]
    fn test_single_line_feature() {
        let collection = to_feature_collection(&sample(), DEFAULT_TRAIL_NAME);
        assert_eq!(collection.features.len(), 1);

        let feature = &collection.features[0];
        assert_eq!(
            feature.property("name").and_then(Value::as_str),
            Some(DEFAULT_TRAIL_NAME)
        );
        match feature.geometry.as_ref().map(|g| &g.value) {
            Some(geojson::Value::LineString(coords)) => {
                assert_eq!(coords.len(), 3);
                assert_eq!(coords[0], vec![-84.1927, 34.6295]);
            }
            other => panic!("expected LineString, got {:?}", other),
        }
    }

    #[test]
    fn test_serialized_document() {
        let text = to_geojson_string(&sample(), "Test Trail").unwrap();
        assert!(text.contains("\n  \"type\""));

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["type"], "FeatureCollection");
        assert_eq!(parsed["features"][0]["type"], "Feature");
        assert_eq!(parsed["features"][0]["properties"]["name"], "Test Trail");
        assert_eq!(parsed["features"][0]["geometry"]["type"], "LineString");
        assert_eq!(
            parsed["features"][0]["geometry"]["coordinates"][2],
            json!([-68.921274, 45.904362])
        );
    }
}
