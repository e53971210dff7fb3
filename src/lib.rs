// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod models;
pub mod playback;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, GeometryError, Result};

use std::sync::Arc;

use config::MetricsConfig;
use services::{CatalogService, SheetClient, TournamentScorer};

// App state for sharing across the application
pub struct AppState {
    pub catalog: CatalogService,
    pub scorer: Arc<dyn TournamentScorer>,
    /// Absent when no tournament sheet URL is configured.
    pub sheet: Option<SheetClient>,
    pub admin_password: Option<String>,
    pub metrics: MetricsConfig,
}
