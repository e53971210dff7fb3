//! Stable application-wide constants.
//!
//! Values here are geometric constants, structural limits, and default
//! fallbacks for env-var-based configuration. Tuning knobs for the map
//! playback live in [`PlaybackConfig`](crate::config::PlaybackConfig).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- Geometry ---

/// Mean Earth radius used by the haversine distance, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// --- Stage catalog ---

/// Directory holding the stage KML/GeoJSON files. Overridden by `STAGES_DIR`.
pub const DEFAULT_STAGES_DIR: &str = "data/stages";
/// How long a resolved catalog is served before the files are re-read: 1 hour.
/// Overridden by `CATALOG_REVALIDATE_SECS`.
pub const DEFAULT_CATALOG_REVALIDATE_SECONDS: u64 = 3_600;

// --- Metrics endpoint ---

/// `Cache-Control` max-age of the metrics endpoint, in seconds.
pub const METRICS_MAX_AGE_SECONDS: u64 = 30;
pub const DEFAULT_METRICS_KM: f64 = 3_200.0;
pub const DEFAULT_METRICS_KG: f64 = 84.0;
pub const DEFAULT_METRICS_SPONSORS: u32 = 10;
/// Fallback countdown used when `RAID_START_DATE` is not configured.
pub const DEFAULT_METRICS_DAYS_TO_GO: i64 = 42;

// --- Tournament scoring process ---

pub const DEFAULT_SCORER_PYTHON: &str = "python";
pub const DEFAULT_SCORER_SCRIPT: &str = "python/scheduler.py";
pub const DEFAULT_SCORER_TMP_DIR: &str = "tmp";
/// Upper bound on a single scoring run before the child is killed.
pub const DEFAULT_SCORER_TIMEOUT_SECONDS: u64 = 30;
