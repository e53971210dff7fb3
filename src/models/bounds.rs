use geo::{BoundingRect, LineString};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::models::LngLat;

/// Axis-aligned bounding box in geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Compute the smallest box enclosing every coordinate of `path`.
    ///
    /// Rejects an empty path rather than returning infinite bounds.
    pub fn from_path(path: &[LngLat]) -> Result<Self, GeometryError> {
        let line: LineString<f64> = path.iter().copied().map(geo::Coord::from).collect();
        let rect = line.bounding_rect().ok_or(GeometryError::EmptyRoute)?;

        Ok(BoundingBox {
            min_lng: rect.min().x,
            min_lat: rect.min().y,
            max_lng: rect.max().x,
            max_lat: rect.max().y,
        })
    }

    /// South-west and north-east corners, the shape map renderers expect
    /// for a fit-bounds request.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.min_lng, self.min_lat], [self.max_lng, self.max_lat]]
    }

    pub fn center(&self) -> LngLat {
        LngLat {
            lng: (self.min_lng + self.max_lng) / 2.0,
            lat: (self.min_lat + self.max_lat) / 2.0,
        }
    }
}
