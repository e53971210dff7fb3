use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Route;

/// Distinguishes transit legs from the raid's competitive legs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Trip,
    Stage,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Trip => write!(f, "trip"),
            StageKind::Stage => write!(f, "stage"),
        }
    }
}

/// A named leg of the raid itinerary with its resolved route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stage {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "coords")]
    pub route: Route,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StagesResponse {
    pub stages: Vec<Stage>,
}
