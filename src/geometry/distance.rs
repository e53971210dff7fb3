use crate::constants::EARTH_RADIUS_KM;
use crate::models::{DistanceKm, LngLat};

/// Great-circle distance between two positions using the haversine formula.
/// Returns kilometers.
///
/// The intermediate term is clamped to 1 before `asin` so floating-point
/// overshoot on antipodal points cannot produce NaN.
pub fn haversine_km(a: LngLat, b: LngLat) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let s1 = (d_lat / 2.0).sin();
    let s2 = (d_lng / 2.0).sin();

    let q = s1 * s1 + a.lat.to_radians().cos() * b.lat.to_radians().cos() * s2 * s2;

    2.0 * EARTH_RADIUS_KM * q.sqrt().min(1.0).asin()
}

/// Sum of the haversine distances between consecutive coordinates.
/// Fewer than two coordinates have no length and yield zero.
pub fn total_distance_km(coords: &[LngLat]) -> DistanceKm {
    coords
        .windows(2)
        .map(|w| DistanceKm::from_raw(haversine_km(w[0], w[1])))
        .sum()
}
