use serde_json::Value;

use crate::error::GeometryError;
use crate::geometry::{kml, SourceFormat};
use crate::models::{LngLat, Route};

/// Parse a raw GeoJSON or KML document into a [`Route`].
pub fn normalize(document: &str, format: SourceFormat) -> Result<Route, GeometryError> {
    let geojson = match format {
        SourceFormat::GeoJson => serde_json::from_str::<Value>(document)
            .map_err(|e| GeometryError::InvalidDocument(format!("GeoJSON: {}", e)))?,
        SourceFormat::Kml => kml::kml_to_geojson_value(document)?,
    };

    geojson_to_route(&geojson)
}

/// Extract a route from a GeoJSON `FeatureCollection`, `Feature`, or bare
/// geometry.
///
/// Only the first `LineString`/`MultiLineString` in document order is used.
/// The sub-lines of a `MultiLineString` are concatenated as-is, without
/// checking that they connect. Coordinate entries that are not a pair of
/// finite, in-range numbers are dropped.
pub fn geojson_to_route(geojson: &Value) -> Result<Route, GeometryError> {
    let geometry = first_line_geometry(geojson).ok_or(GeometryError::UnsupportedGeometry)?;

    let raw: Vec<&Value> = match type_of(geometry) {
        Some("LineString") => array_items(geometry.get("coordinates")).collect(),
        Some("MultiLineString") => array_items(geometry.get("coordinates"))
            .flat_map(|segment| array_items(Some(segment)))
            .collect(),
        _ => return Err(GeometryError::UnsupportedGeometry),
    };

    let coords: Vec<LngLat> = raw.iter().filter_map(|v| parse_position(v)).collect();

    if coords.len() < raw.len() {
        tracing::debug!(
            dropped = raw.len() - coords.len(),
            kept = coords.len(),
            "Dropped invalid coordinate entries"
        );
    }

    Route::new(coords)
}

fn type_of(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

fn is_line_geometry(value: &Value) -> bool {
    matches!(type_of(value), Some("LineString") | Some("MultiLineString"))
}

fn first_line_geometry(geojson: &Value) -> Option<&Value> {
    match type_of(geojson)? {
        "FeatureCollection" => geojson
            .get("features")?
            .as_array()?
            .iter()
            .filter_map(|feature| feature.get("geometry"))
            .find(|geometry| is_line_geometry(geometry)),
        "Feature" => geojson.get("geometry").filter(|g| is_line_geometry(g)),
        _ if is_line_geometry(geojson) => Some(geojson),
        _ => None,
    }
}

/// Items of a JSON array; anything else (missing, null, object) yields nothing.
fn array_items(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .into_iter()
        .flat_map(|items| items.iter())
}

/// Accept `[lng, lat, ...]` where both leading entries are numbers or numeric
/// strings. Extra entries (altitude, time) are ignored.
fn parse_position(value: &Value) -> Option<LngLat> {
    let items = value.as_array()?;
    if items.len() < 2 {
        return None;
    }
    let lng = parse_number(&items[0])?;
    let lat = parse_number(&items[1])?;
    LngLat::new(lng, lat).ok()
}

fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}
