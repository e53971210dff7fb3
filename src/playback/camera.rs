use serde::{Deserialize, Serialize};

use crate::models::{BoundingBox, LngLat};

/// An imperative request to the map renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum CameraCommand {
    /// Move instantly, no transition.
    #[serde(rename_all = "camelCase")]
    JumpTo {
        center: LngLat,
        zoom: f64,
        pitch: f64,
    },
    /// Animate to a camera position. A zero duration moves within the
    /// current frame.
    #[serde(rename_all = "camelCase")]
    EaseTo {
        center: LngLat,
        zoom: f64,
        pitch: f64,
        duration_ms: u64,
    },
    /// Frame a bounding box, leaving `padding` pixels on every side.
    #[serde(rename_all = "camelCase")]
    FitBounds {
        bounds: BoundingBox,
        padding: f64,
        duration_ms: u64,
    },
}
