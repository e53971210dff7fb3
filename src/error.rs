use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::scoring::ScorerError;

/// Failures of the geometry layer: normalizing documents into routes and
/// deriving bounds from them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("no LineString or MultiLineString geometry found")]
    UnsupportedGeometry,

    #[error("route has {found} valid coordinate(s), at least 2 required")]
    DegenerateRoute { found: usize },

    #[error("cannot compute the bounding box of an empty route")]
    EmptyRoute,

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Failed to load stage file {file}: {reason}")]
    CatalogLoad { file: String, reason: String },

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error(transparent)]
    Scorer(#[from] ScorerError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e.to_string())
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::CatalogLoad { .. } => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
            AppError::Upstream(ref e) => {
                tracing::warn!("Upstream service error: {}", e);
                (StatusCode::BAD_GATEWAY, json!({ "error": e }))
            }
            AppError::Network(ref e) => {
                tracing::warn!("Network error: {}", e);
                (StatusCode::BAD_GATEWAY, json!({ "error": e }))
            }
            AppError::Scorer(ScorerError::ProcessFailed { ref details }) => {
                tracing::error!("Scoring process failed: {}", details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Scoring process failed", "details": details }),
                )
            }
            AppError::Scorer(ScorerError::InvalidOutput { ref output }) => {
                tracing::error!("Scoring process produced non-JSON output");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to parse scoring output", "output": output }),
                )
            }
            AppError::Scorer(ref e) => {
                tracing::error!("Scoring error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": e.to_string() }),
                )
            }
            AppError::NotFound(ref e) => (StatusCode::NOT_FOUND, json!({ "error": e })),
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
