//! KML to GeoJSON transcoding.
//!
//! Follows the usual togeojson mapping: every `Placemark` becomes a
//! `Feature`, its `name`/`description` become properties, and its geometries
//! map to `Polygon`, `LineString`, `Point`, with `gx:Track` becoming a
//! `LineString`. A placemark holding several geometries (for example through
//! `MultiGeometry`) becomes a `GeometryCollection`.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use roxmltree::{Document, Node};

use crate::error::GeometryError;

/// Transcode a KML document into a GeoJSON feature collection.
pub fn kml_to_geojson(document: &str) -> Result<FeatureCollection, GeometryError> {
    let doc = Document::parse(document)
        .map_err(|e| GeometryError::InvalidDocument(format!("KML: {}", e)))?;

    let features: Vec<Feature> = doc
        .descendants()
        .filter(|n| n.has_tag_name("Placemark"))
        .map(placemark_to_feature)
        .collect();

    tracing::debug!(features = features.len(), "Transcoded KML placemarks");

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

/// Transcode a KML document into a GeoJSON value ready for normalization.
pub fn kml_to_geojson_value(document: &str) -> Result<serde_json::Value, GeometryError> {
    let collection = kml_to_geojson(document)?;
    serde_json::to_value(GeoJson::FeatureCollection(collection))
        .map_err(|e| GeometryError::InvalidDocument(format!("KML: {}", e)))
}

fn placemark_to_feature(placemark: Node) -> Feature {
    let mut geometries = Vec::new();

    for polygon in placemark.descendants().filter(|n| n.has_tag_name("Polygon")) {
        let rings: Vec<Vec<Vec<f64>>> = polygon
            .descendants()
            .filter(|n| n.has_tag_name("LinearRing"))
            .map(|ring| parse_coordinates(child_text(ring, "coordinates")))
            .collect();
        if !rings.is_empty() {
            geometries.push(Geometry::new(Value::Polygon(rings)));
        }
    }

    for line in placemark
        .descendants()
        .filter(|n| n.has_tag_name("LineString"))
    {
        let coords = parse_coordinates(child_text(line, "coordinates"));
        if !coords.is_empty() {
            geometries.push(Geometry::new(Value::LineString(coords)));
        }
    }

    for point in placemark.descendants().filter(|n| n.has_tag_name("Point")) {
        if let Some(position) = parse_coordinates(child_text(point, "coordinates"))
            .into_iter()
            .next()
        {
            geometries.push(Geometry::new(Value::Point(position)));
        }
    }

    // gx:Track carries one "lng lat alt" tuple per gx:coord element
    for track in placemark.descendants().filter(|n| n.has_tag_name("Track")) {
        let coords: Vec<Vec<f64>> = track
            .children()
            .filter(|n| n.has_tag_name("coord"))
            .filter_map(|n| parse_tuple(n.text()?.split_whitespace()))
            .collect();
        if !coords.is_empty() {
            geometries.push(Geometry::new(Value::LineString(coords)));
        }
    }

    let geometry = match geometries.len() {
        0 => None,
        1 => geometries.pop(),
        _ => Some(Geometry::new(Value::GeometryCollection(geometries))),
    };

    let mut properties = JsonObject::new();
    for key in ["name", "description"] {
        if let Some(text) = child_text(placemark, key) {
            properties.insert(key.to_string(), text.trim().into());
        }
    }

    Feature {
        bbox: None,
        geometry,
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children().find(|n| n.has_tag_name(tag))?.text()
}

/// Parse a KML `<coordinates>` body: whitespace-separated `lng,lat[,alt]`
/// tuples. Tuples that do not parse are skipped.
fn parse_coordinates(text: Option<&str>) -> Vec<Vec<f64>> {
    text.unwrap_or_default()
        .split_whitespace()
        .filter_map(|tuple| parse_tuple(tuple.split(',')))
        .collect()
}

fn parse_tuple<'a>(parts: impl Iterator<Item = &'a str>) -> Option<Vec<f64>> {
    let position = parts
        .filter(|p| !p.is_empty())
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .ok()?;
    (position.len() >= 2).then_some(position)
}
