use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::tournament::{AuthRequest, AuthResponse};
use crate::AppState;

/// POST /api/torneo/auth
/// Check the admin panel password against the configured secret
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<AuthResponse>) {
    let request: AuthRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Rejecting malformed auth request: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(AuthResponse::failure("Invalid request")),
            );
        }
    };

    let Some(expected) = state.admin_password.as_deref() else {
        tracing::error!("ADMIN_PASSWORD not set, admin login unavailable");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AuthResponse::failure("Server configuration error")),
        );
    };

    if request.password.as_deref() == Some(expected) {
        tracing::info!("Admin login succeeded");
        (StatusCode::OK, Json(AuthResponse::ok()))
    } else {
        tracing::warn!("Admin login rejected");
        (
            StatusCode::UNAUTHORIZED,
            Json(AuthResponse::failure("Invalid password")),
        )
    }
}

/// POST /api/torneo/calculate
/// Run raw tournament data through the scorer and return its output verbatim
pub async fn calculate(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>> {
    let data: Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::Internal(format!("Calculate body is not valid JSON: {}", e)))?;

    let result = state.scorer.score(&data).await?;
    Ok(Json(result))
}

/// GET /api/torneo/data
/// Fetch the tournament sheet and score it, falling back to the raw data if
/// scoring fails
pub async fn tournament_data(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let sheet = state
        .sheet
        .as_ref()
        .ok_or_else(|| AppError::Internal("TOURNAMENT_SHEET_URL is not configured".to_string()))?;

    let raw = sheet.fetch_raw().await?;

    match state.scorer.score(&raw).await {
        Ok(scored) => Ok(Json(scored)),
        Err(e) => {
            tracing::warn!("Scoring failed, serving raw tournament data: {}", e);
            Ok(Json(raw))
        }
    }
}
