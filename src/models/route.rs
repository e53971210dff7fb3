use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geometry::distance::total_distance_km;
use crate::models::{DistanceKm, LngLat};

/// An ordered path of travel with at least two coordinates.
///
/// Routes are built once at load time and never mutated; animations only
/// borrow prefixes of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LngLat>", into = "Vec<LngLat>")]
pub struct Route(Vec<LngLat>);

impl Route {
    pub fn new(coords: Vec<LngLat>) -> Result<Self, GeometryError> {
        if coords.len() < 2 {
            return Err(GeometryError::DegenerateRoute {
                found: coords.len(),
            });
        }
        Ok(Route(coords))
    }

    pub fn coords(&self) -> &[LngLat] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> LngLat {
        self.0[0]
    }

    pub fn last(&self) -> LngLat {
        self.0[self.0.len() - 1]
    }

    /// The first `count` coordinates, clamped to the route length.
    pub fn prefix(&self, count: usize) -> &[LngLat] {
        &self.0[..count.min(self.0.len())]
    }

    pub fn distance_km(&self) -> DistanceKm {
        total_distance_km(&self.0)
    }
}

impl TryFrom<Vec<LngLat>> for Route {
    type Error = GeometryError;

    fn try_from(coords: Vec<LngLat>) -> Result<Self, Self::Error> {
        Route::new(coords)
    }
}

impl From<Route> for Vec<LngLat> {
    fn from(route: Route) -> Self {
        route.0
    }
}
