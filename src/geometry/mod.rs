//! Route geometry: document normalization (GeoJSON and KML) and the
//! distance engine.

pub mod distance;
pub mod kml;
mod normalize;

use std::path::Path;

pub use distance::{haversine_km, total_distance_km};
pub use normalize::{geojson_to_route, normalize};

/// Format of a stage source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    GeoJson,
    Kml,
}

impl SourceFormat {
    /// `.kml` (any case) is KML; every other extension is read as GeoJSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("kml") => SourceFormat::Kml,
            _ => SourceFormat::GeoJson,
        }
    }
}
