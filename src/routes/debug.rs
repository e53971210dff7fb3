use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if the catalog and scorer are usable
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    // Check stage catalog
    match state.catalog.stages().await {
        Ok(stages) => {
            status["checks"]["catalog"] = json!({
                "stages": stages.len(),
                "dir": state.catalog.dir().display().to_string(),
            });
        }
        Err(e) => {
            status["checks"]["catalog"] = json!({"error": e.to_string()});
            status["status"] = json!("error");
        }
    }

    // Check scorer
    status["checks"]["scorer"] = if state.scorer.is_available() {
        json!("ok")
    } else {
        json!({"error": "scoring script not found"})
    };

    status["checks"]["tournament_sheet"] = json!(state.sheet.is_some());

    Json(status)
}
