use serde::{Deserialize, Serialize};

use crate::geometry::distance::haversine_km;

/// A WGS84 position in GeoJSON axis order: longitude first, then latitude.
/// Serialized as a two-element `[lng, lat]` array.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Result<Self, String> {
        if !lng.is_finite() || !lat.is_finite() {
            return Err(format!("Non-finite coordinate: ({}, {})", lng, lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        Ok(LngLat { lng, lat })
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_to(&self, other: &LngLat) -> f64 {
        haversine_km(*self, *other)
    }
}

impl TryFrom<[f64; 2]> for LngLat {
    type Error = String;

    fn try_from([lng, lat]: [f64; 2]) -> Result<Self, Self::Error> {
        LngLat::new(lng, lat)
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(c: LngLat) -> Self {
        [c.lng, c.lat]
    }
}

impl From<LngLat> for geo::Coord<f64> {
    fn from(c: LngLat) -> Self {
        geo::Coord { x: c.lng, y: c.lat }
    }
}
