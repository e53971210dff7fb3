pub mod debug;
pub mod metrics;
pub mod stages;
pub mod torneo;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/uniraid2026/stages", get(stages::list_stages))
        .route(
            "/api/uniraid2026/stages/{id}/geojson",
            get(stages::stage_geojson),
        )
        .route("/api/metrics", get(metrics::get_metrics))
        .route("/api/torneo/auth", post(torneo::authenticate))
        .route("/api/torneo/calculate", post(torneo::calculate))
        .route("/api/torneo/data", get(torneo::tournament_data))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
