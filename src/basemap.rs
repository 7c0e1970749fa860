// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Country-boundary polylines for the map background.
//!
//! Boundaries load from a GeoJSON file when one is configured. Without one,
//! a coarse built-in outline of the Dutch coast and southern border ships in
//! the binary so the default map window is never blank.

use std::error::Error;
use std::fs;
use std::path::Path;

use log::info;
use serde_json::Value;

/// Coarse North Sea coastline, south to north (lon, lat).
const COASTLINE: &[(f64, f64)] = &[
    (3.20, 51.35),
    (3.50, 51.45),
    (3.70, 51.68),
    (4.00, 51.85),
    (4.12, 51.99),
    (4.28, 52.11),
    (4.56, 52.46),
    (4.65, 52.76),
    (4.72, 52.96),
    (4.90, 53.03),
    (5.10, 53.07),
    (5.42, 53.17),
    (5.80, 53.27),
];

/// The Afsluitdijk closing off the IJsselmeer.
const AFSLUITDIJK: &[(f64, f64)] = &[(5.03, 52.93), (5.35, 53.07)];

/// Coarse Belgian border, west to east.
const SOUTHERN_BORDER: &[(f64, f64)] = &[
    (3.38, 51.27),
    (3.90, 51.21),
    (4.24, 51.35),
    (4.65, 51.42),
    (5.03, 51.49),
    (5.24, 51.26),
    (5.57, 51.22),
    (5.80, 51.15),
];

/// Boundary polylines drawn behind the track on the map view.
#[derive(Debug, Clone)]
pub struct Basemap {
    polylines: Vec<Vec<(f64, f64)>>,
}

impl Basemap {
    /// The built-in fallback outline.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            polylines: vec![
                COASTLINE.to_vec(),
                AFSLUITDIJK.to_vec(),
                SOUTHERN_BORDER.to_vec(),
            ],
        }
    }

    /// Load boundary polylines from a GeoJSON file.
    pub fn load_geojson(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let basemap = Self::from_geojson_str(&text)?;
        info!(
            "loaded {} boundary polylines from {}",
            basemap.polylines.len(),
            path.display()
        );
        Ok(basemap)
    }

    /// Parse boundary polylines out of a GeoJSON document.
    pub fn from_geojson_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        let mut polylines = Vec::new();
        collect_geometry(&value, &mut polylines);
        Ok(Self { polylines })
    }

    /// The boundary polylines, each a (lon, lat) sequence.
    #[must_use]
    pub fn polylines(&self) -> &[Vec<(f64, f64)>] {
        &self.polylines
    }
}

/// Walk a GeoJSON value, collecting every line geometry it contains.
/// Unrecognised members are skipped rather than rejected.
fn collect_geometry(value: &Value, out: &mut Vec<Vec<(f64, f64)>>) {
    match value.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            if let Some(features) = value.get("features").and_then(Value::as_array) {
                for feature in features {
                    collect_geometry(feature, out);
                }
            }
        }
        Some("Feature") => {
            if let Some(geometry) = value.get("geometry") {
                collect_geometry(geometry, out);
            }
        }
        Some("GeometryCollection") => {
            if let Some(geometries) = value.get("geometries").and_then(Value::as_array) {
                for geometry in geometries {
                    collect_geometry(geometry, out);
                }
            }
        }
        Some("LineString") => {
            push_line(value.get("coordinates"), out);
        }
        // A polygon is its rings; boundary rendering does not fill, so rings
        // and line strings are the same thing here.
        Some("MultiLineString") | Some("Polygon") => {
            if let Some(lines) = value.get("coordinates").and_then(Value::as_array) {
                for line in lines {
                    push_line(Some(line), out);
                }
            }
        }
        Some("MultiPolygon") => {
            if let Some(polygons) = value.get("coordinates").and_then(Value::as_array) {
                for polygon in polygons {
                    if let Some(rings) = polygon.as_array() {
                        for ring in rings {
                            push_line(Some(ring), out);
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

fn push_line(coordinates: Option<&Value>, out: &mut Vec<Vec<(f64, f64)>>) {
    let Some(points) = coordinates.and_then(Value::as_array) else {
        return;
    };
    let line: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|point| {
            let point = point.as_array()?;
            Some((point.first()?.as_f64()?, point.get(1)?.as_f64()?))
        })
        .collect();
    if line.len() >= 2 {
        out.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_outline_fits_the_default_window() {
        let basemap = Basemap::builtin();
        assert!(!basemap.polylines().is_empty());
        for line in basemap.polylines() {
            assert!(line.len() >= 2);
            for &(lon, lat) in line {
                assert!((3.2..=5.8).contains(&lon));
                assert!((51.0..=54.0).contains(&lat));
            }
        }
    }

    #[test]
    fn test_feature_collection_geometries() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"name": "border"},
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[3.4, 51.3], [4.0, 51.5]]
                    }
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[4.0, 52.0], [4.5, 52.0], [4.5, 52.5], [4.0, 52.0]]]
                    }
                }
            ]
        }"#;
        let basemap = Basemap::from_geojson_str(geojson).unwrap();
        assert_eq!(basemap.polylines().len(), 2);
        assert_eq!(basemap.polylines()[0], vec![(3.4, 51.3), (4.0, 51.5)]);
        assert_eq!(basemap.polylines()[1].len(), 4);
    }

    #[test]
    fn test_multipolygon_rings() {
        let geojson = r#"{
            "type": "MultiPolygon",
            "coordinates": [
                [[[3.0, 51.0], [3.5, 51.0], [3.5, 51.5], [3.0, 51.0]]],
                [[[5.0, 53.0], [5.5, 53.0], [5.5, 53.5], [5.0, 53.0]]]
            ]
        }"#;
        let basemap = Basemap::from_geojson_str(geojson).unwrap();
        assert_eq!(basemap.polylines().len(), 2);
    }

    #[test]
    fn test_degenerate_and_unknown_members_are_skipped() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [4.0, 52.0]}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[4.0, 52.0]]}},
                {"type": "Feature", "geometry": null}
            ]
        }"#;
        let basemap = Basemap::from_geojson_str(geojson).unwrap();
        assert!(basemap.polylines().is_empty());
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        assert!(Basemap::from_geojson_str("not json").is_err());
    }
}
