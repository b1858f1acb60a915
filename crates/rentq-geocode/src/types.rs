//! Geocode provider response types.
//!
//! The autocomplete endpoint answers with a GeoJSON feature collection. Only
//! the fields needed to build a [`LocationRef`] are modelled.

use rentq_core::{Coordinates, LocationRef};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: FeatureProperties,
}

/// GeoJSON point geometry. Coordinates are ordered `[lon, lat]`.
#[derive(Debug, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeatureProperties {
    /// Fully qualified display label, e.g. `"Leipzig, SN, Germany"`.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Feature {
    /// Maps the feature to a [`LocationRef`].
    ///
    /// The label falls back to `properties.name`, then to `query`. Returns
    /// `None` when the feature carries no usable point.
    #[must_use]
    pub fn to_location_ref(&self, query: &str) -> Option<LocationRef> {
        let coords = &self.geometry.as_ref()?.coordinates;
        let (&lon, &lat) = (coords.first()?, coords.get(1)?);

        let label = self
            .properties
            .label
            .as_deref()
            .or(self.properties.name.as_deref())
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(query)
            .to_string();

        Some(LocationRef {
            label,
            coordinates: Coordinates { lat, lon },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(value: serde_json::Value) -> Feature {
        serde_json::from_value(value).expect("feature fixture should parse")
    }

    #[test]
    fn swaps_geojson_lon_lat_order() {
        let f = feature(serde_json::json!({
            "geometry": { "type": "Point", "coordinates": [12.37, 51.34] },
            "properties": { "label": "Leipzig, Germany" }
        }));
        let loc = f.to_location_ref("leipzig").unwrap();
        assert_eq!(loc.label, "Leipzig, Germany");
        assert!((loc.coordinates.lat - 51.34).abs() < f64::EPSILON);
        assert!((loc.coordinates.lon - 12.37).abs() < f64::EPSILON);
    }

    #[test]
    fn label_falls_back_to_name_then_query() {
        let named = feature(serde_json::json!({
            "geometry": { "coordinates": [1.0, 2.0] },
            "properties": { "name": "Lyon" }
        }));
        assert_eq!(named.to_location_ref("ly").unwrap().label, "Lyon");

        let bare = feature(serde_json::json!({ "geometry": { "coordinates": [1.0, 2.0] } }));
        assert_eq!(bare.to_location_ref("ly").unwrap().label, "ly");
    }

    #[test]
    fn feature_without_point_is_unusable() {
        let f = feature(serde_json::json!({ "properties": { "label": "Nowhere" } }));
        assert!(f.to_location_ref("nowhere").is_none());

        let short = feature(serde_json::json!({ "geometry": { "coordinates": [1.0] } }));
        assert!(short.to_location_ref("x").is_none());
    }
}
