use crate::constants::*;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use time::macros::format_description;
use time::Date;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub stages_dir: PathBuf,
    pub catalog_revalidate_secs: u64,
    /// Shared secret for the tournament admin panel. Unset means the auth
    /// endpoint reports a server configuration error.
    pub admin_password: Option<String>,
    /// Google Sheets (Apps Script) endpoint serving raw tournament data.
    pub tournament_sheet_url: Option<String>,
    pub scorer: ScorerConfig,
    pub metrics: MetricsConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone)]
pub struct ScorerConfig {
    pub python: String,
    pub script: PathBuf,
    pub tmp_dir: PathBuf,
    pub timeout_secs: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            python: DEFAULT_SCORER_PYTHON.to_string(),
            script: PathBuf::from(DEFAULT_SCORER_SCRIPT),
            tmp_dir: PathBuf::from(DEFAULT_SCORER_TMP_DIR),
            timeout_secs: DEFAULT_SCORER_TIMEOUT_SECONDS,
        }
    }
}

impl ScorerConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        Ok(Self {
            python: env::var("SCORER_PYTHON").unwrap_or(defaults.python),
            script: env::var("SCORER_SCRIPT")
                .map(PathBuf::from)
                .unwrap_or(defaults.script),
            tmp_dir: env::var("SCORER_TMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.tmp_dir),
            timeout_secs: env::var("SCORER_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.timeout_secs.to_string())
                .parse()
                .map_err(|_| "Invalid SCORER_TIMEOUT_SECS")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub km: f64,
    pub kg: f64,
    pub sponsors: u32,
    /// Used when `raid_start_date` is absent.
    pub days_to_go: i64,
    pub raid_start_date: Option<Date>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            km: DEFAULT_METRICS_KM,
            kg: DEFAULT_METRICS_KG,
            sponsors: DEFAULT_METRICS_SPONSORS,
            days_to_go: DEFAULT_METRICS_DAYS_TO_GO,
            raid_start_date: None,
        }
    }
}

impl MetricsConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let raid_start_date = match env::var("RAID_START_DATE") {
            Ok(raw) => Some(parse_date(&raw)?),
            Err(_) => None,
        };

        Ok(Self {
            km: env::var("METRICS_KM")
                .unwrap_or_else(|_| defaults.km.to_string())
                .parse()
                .map_err(|_| "Invalid METRICS_KM")?,
            kg: env::var("METRICS_KG")
                .unwrap_or_else(|_| defaults.kg.to_string())
                .parse()
                .map_err(|_| "Invalid METRICS_KG")?,
            sponsors: env::var("METRICS_SPONSORS")
                .unwrap_or_else(|_| defaults.sponsors.to_string())
                .parse()
                .map_err(|_| "Invalid METRICS_SPONSORS")?,
            days_to_go: env::var("METRICS_DAYS_TO_GO")
                .unwrap_or_else(|_| defaults.days_to_go.to_string())
                .parse()
                .map_err(|_| "Invalid METRICS_DAYS_TO_GO")?,
            raid_start_date,
        })
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<Date, String> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("Invalid RAID_START_DATE '{}': {}", raw, e))
}

/// Tuning knobs for the map reveal animation, flyover simulation and
/// viewport fitting.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Wall-clock duration of the progressive route reveal.
    pub reveal_duration_ms: u64,

    /// Upper bound on waiting for the renderer to settle before a flyover.
    pub preload_timeout_ms: u64,

    /// Simulated kilometers covered per real kilometer of the chosen speed.
    /// At 1000x, 50 km/h advances 13.9 km per real second.
    pub speedup_factor: f64,

    /// Floor applied to the user speed so a step is never zero or negative.
    pub min_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub default_speed_kmh: f64,

    pub min_zoom: f64,
    pub max_zoom: f64,
    pub default_zoom: f64,

    /// Camera pitch (degrees) while following the route.
    pub flyover_pitch: f64,

    // --- Overview shown once a flyover completes ---
    pub overview_pitch: f64,
    pub overview_zoom: f64,
    pub overview_duration_ms: u64,

    // --- Fit-bounds on selection change ---
    pub fit_padding: f64,
    pub fit_duration_ms: u64,

    /// Tick period of the headless playback driver (~60 Hz).
    pub frame_interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            reveal_duration_ms: 1_000,
            preload_timeout_ms: 4_000,
            speedup_factor: 1_000.0,
            min_speed_kmh: 5.0,
            max_speed_kmh: 300.0,
            default_speed_kmh: 80.0,
            min_zoom: 3.0,
            max_zoom: 16.0,
            default_zoom: 12.0,
            flyover_pitch: 60.0,
            overview_pitch: 20.0,
            overview_zoom: 6.0,
            overview_duration_ms: 3_000,
            fit_padding: 110.0,
            fit_duration_ms: 900,
            frame_interval_ms: 16,
        }
    }
}

impl PlaybackConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let config = Self {
            reveal_duration_ms: env::var("PLAYBACK_REVEAL_DURATION_MS")
                .unwrap_or_else(|_| defaults.reveal_duration_ms.to_string())
                .parse()
                .map_err(|_| "Invalid PLAYBACK_REVEAL_DURATION_MS")?,

            preload_timeout_ms: env::var("PLAYBACK_PRELOAD_TIMEOUT_MS")
                .unwrap_or_else(|_| defaults.preload_timeout_ms.to_string())
                .parse()
                .map_err(|_| "Invalid PLAYBACK_PRELOAD_TIMEOUT_MS")?,

            speedup_factor: env::var("PLAYBACK_SPEEDUP_FACTOR")
                .unwrap_or_else(|_| defaults.speedup_factor.to_string())
                .parse()
                .map_err(|_| "Invalid PLAYBACK_SPEEDUP_FACTOR")?,

            min_speed_kmh: env::var("PLAYBACK_MIN_SPEED_KMH")
                .unwrap_or_else(|_| defaults.min_speed_kmh.to_string())
                .parse()
                .map_err(|_| "Invalid PLAYBACK_MIN_SPEED_KMH")?,

            max_speed_kmh: env::var("PLAYBACK_MAX_SPEED_KMH")
                .unwrap_or_else(|_| defaults.max_speed_kmh.to_string())
                .parse()
                .map_err(|_| "Invalid PLAYBACK_MAX_SPEED_KMH")?,

            default_speed_kmh: env::var("PLAYBACK_DEFAULT_SPEED_KMH")
                .unwrap_or_else(|_| defaults.default_speed_kmh.to_string())
                .parse()
                .map_err(|_| "Invalid PLAYBACK_DEFAULT_SPEED_KMH")?,

            default_zoom: env::var("PLAYBACK_DEFAULT_ZOOM")
                .unwrap_or_else(|_| defaults.default_zoom.to_string())
                .parse()
                .map_err(|_| "Invalid PLAYBACK_DEFAULT_ZOOM")?,

            frame_interval_ms: env::var("PLAYBACK_FRAME_INTERVAL_MS")
                .unwrap_or_else(|_| defaults.frame_interval_ms.to_string())
                .parse()
                .map_err(|_| "Invalid PLAYBACK_FRAME_INTERVAL_MS")?,

            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.reveal_duration_ms == 0 {
            return Err("PLAYBACK_REVEAL_DURATION_MS must be positive".to_string());
        }
        if self.frame_interval_ms == 0 {
            return Err("PLAYBACK_FRAME_INTERVAL_MS must be positive".to_string());
        }
        if !(self.speedup_factor.is_finite() && self.speedup_factor > 0.0) {
            return Err("PLAYBACK_SPEEDUP_FACTOR must be a positive number".to_string());
        }
        if !(self.min_speed_kmh > 0.0 && self.min_speed_kmh <= self.max_speed_kmh) {
            return Err(
                "PLAYBACK_MIN_SPEED_KMH must be positive and below the maximum speed".to_string(),
            );
        }
        if !self.default_speed_kmh.is_finite() {
            return Err("PLAYBACK_DEFAULT_SPEED_KMH must be a number".to_string());
        }
        if !(self.min_zoom.is_finite() && self.max_zoom.is_finite() && self.min_zoom <= self.max_zoom)
        {
            return Err("min_zoom must not exceed max_zoom".to_string());
        }
        if !self.default_zoom.is_finite() {
            return Err("PLAYBACK_DEFAULT_ZOOM must be a number".to_string());
        }
        Ok(())
    }

    pub fn reveal_duration(&self) -> Duration {
        Duration::from_millis(self.reveal_duration_ms)
    }

    pub fn preload_timeout(&self) -> Duration {
        Duration::from_millis(self.preload_timeout_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        let catalog_revalidate_secs: u64 = env::var("CATALOG_REVALIDATE_SECS")
            .unwrap_or_else(|_| DEFAULT_CATALOG_REVALIDATE_SECONDS.to_string())
            .parse()
            .map_err(|_| "Invalid CATALOG_REVALIDATE_SECS")?;

        if catalog_revalidate_secs == 0 {
            return Err("CATALOG_REVALIDATE_SECS must be positive".to_string());
        }

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            stages_dir: env::var("STAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STAGES_DIR)),
            catalog_revalidate_secs,
            admin_password: env::var("ADMIN_PASSWORD").ok().filter(|p| !p.is_empty()),
            tournament_sheet_url: env::var("TOURNAMENT_SHEET_URL").ok(),
            scorer: ScorerConfig::from_env()?,
            metrics: MetricsConfig::from_env()?,
            playback: PlaybackConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
