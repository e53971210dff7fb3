use serde::{Deserialize, Serialize};

/// Headline figures shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub km: f64,
    pub kg: f64,
    pub sponsors: u32,
    pub days_to_go: i64,
}
