use axum::{
    extract::{Path, Query, State},
    Json,
};
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::error::Result;
use crate::geometry::total_distance_km;
use crate::models::{Stage, StagesResponse};
use crate::services::catalog::total_catalog_km;
use crate::AppState;

/// GET /api/uniraid2026/stages
/// List every stage of the raid with its full route
pub async fn list_stages(State(state): State<Arc<AppState>>) -> Result<Json<StagesResponse>> {
    let stages = state.catalog.stages().await?;

    tracing::debug!(
        stages = stages.len(),
        total_km = total_catalog_km(&stages).as_km(),
        "Serving stage catalog"
    );

    Ok(Json(StagesResponse {
        stages: stages.to_vec(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct GeoJsonQuery {
    /// Export only the first N points (the drawn prefix of a reveal).
    pub points: Option<usize>,
}

/// GET /api/uniraid2026/stages/{id}/geojson
/// Export one stage route as a GeoJSON FeatureCollection
pub async fn stage_geojson(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Query(query): Query<GeoJsonQuery>,
) -> Result<Json<FeatureCollection>> {
    let stage = state.catalog.stage(id).await?;
    Ok(Json(stage_feature_collection(&stage, query.points)))
}

/// Build a single-feature collection for `stage`, truncated to `points`
/// coordinates when given. At least one coordinate is always kept.
pub fn stage_feature_collection(stage: &Stage, points: Option<usize>) -> FeatureCollection {
    let coords = match points {
        Some(n) => stage.route.prefix(n.max(1)),
        None => stage.route.coords(),
    };
    let line: Vec<Vec<f64>> = coords.iter().map(|c| vec![c.lng, c.lat]).collect();

    let mut properties = serde_json::Map::new();
    properties.insert("id".to_string(), json!(stage.id));
    properties.insert("name".to_string(), json!(stage.name));
    properties.insert("type".to_string(), json!(stage.kind));
    if let Some(description) = &stage.description {
        properties.insert("description".to_string(), json!(description));
    }
    properties.insert("points".to_string(), json!(coords.len()));
    properties.insert(
        "distanceKm".to_string(),
        json!(total_distance_km(coords).as_km()),
    );

    FeatureCollection {
        bbox: None,
        features: vec![Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(line))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }],
        foreign_members: None,
    }
}
