use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use time::OffsetDateTime;

use crate::constants::METRICS_MAX_AGE_SECONDS;
use crate::services::metrics::current_metrics;
use crate::AppState;

/// GET /api/metrics
/// Headline numbers for the landing page; cacheable for a short window
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    let today = OffsetDateTime::now_utc().date();
    let metrics = current_metrics(&state.metrics, today);

    (
        [(
            header::CACHE_CONTROL,
            format!("public, max-age={}", METRICS_MAX_AGE_SECONDS),
        )],
        Json(metrics),
    )
        .into_response()
}
