use async_trait::async_trait;
use dunex::config::MetricsConfig;
use dunex::services::{CatalogService, ScorerError, SheetClient, StageFile, TournamentScorer};
use dunex::models::StageKind;
use dunex::AppState;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[allow(dead_code)]
pub const ADMIN_PASSWORD: &str = "arena-roja";

/// Straight three-point route from Errachidia towards Erg Chebbi
#[allow(dead_code)]
pub const SIMPLE_GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [{
    "type": "Feature",
    "properties": {"name": "Etapa 2"},
    "geometry": {
      "type": "LineString",
      "coordinates": [[-4.4265, 31.9314], [-4.2320, 31.4310], [-4.0128, 31.0990]]
    }
  }]
}"#;

/// The same route as `SIMPLE_GEOJSON`, as KML
#[allow(dead_code)]
pub const SIMPLE_KML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <Placemark>
      <name>Etapa 2</name>
      <LineString>
        <coordinates>
          -4.4265,31.9314,0 -4.2320,31.4310,0
          -4.0128,31.0990,0
        </coordinates>
      </LineString>
    </Placemark>
  </Document>
</kml>"#;

/// Create an empty temp directory with a unique name
#[allow(dead_code)]
pub async fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}-{}", prefix, Uuid::new_v4()));
    tokio::fs::create_dir_all(&dir)
        .await
        .expect("Failed to create temp dir");
    dir
}

/// Write `files` (name, contents) into a fresh stage directory
#[allow(dead_code)]
pub async fn stage_dir(files: &[(&str, &str)]) -> PathBuf {
    let dir = temp_dir("dunex-stages").await;
    for (name, contents) in files {
        tokio::fs::write(dir.join(name), contents)
            .await
            .expect("Failed to write stage fixture");
    }
    dir
}

/// Directory holding the stage files shipped with the crate
#[allow(dead_code)]
pub fn shipped_stages_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/stages")
}

/// Two-stage manifest over `stage-a.geojson` and `stage-b.kml`
#[allow(dead_code)]
pub fn test_manifest() -> Vec<StageFile> {
    vec![
        StageFile::new(1, "Etapa A", "stage-a.geojson", StageKind::Trip, None),
        StageFile::new(
            2,
            "Etapa B",
            "stage-b.kml",
            StageKind::Stage,
            Some("Errachidia → Erg Chebbi"),
        ),
    ]
}

/// Scorer double: echoes its input wrapped in `{"scored": ...}`, or fails.
#[allow(dead_code)]
pub struct FakeScorer {
    pub fail_with: Option<ScorerError>,
}

#[async_trait]
impl TournamentScorer for FakeScorer {
    async fn score(&self, data: &Value) -> Result<Value, ScorerError> {
        match &self.fail_with {
            Some(e) => Err(e.clone()),
            None => Ok(json!({ "scored": data })),
        }
    }
}

#[allow(dead_code)]
pub fn ok_scorer() -> Arc<dyn TournamentScorer> {
    Arc::new(FakeScorer { fail_with: None })
}

#[allow(dead_code)]
pub fn failing_scorer(error: ScorerError) -> Arc<dyn TournamentScorer> {
    Arc::new(FakeScorer {
        fail_with: Some(error),
    })
}

/// Build app state over `stages_dir` with the test manifest
#[allow(dead_code)]
pub fn test_state(
    stages_dir: PathBuf,
    scorer: Arc<dyn TournamentScorer>,
    admin_password: Option<&str>,
) -> Arc<AppState> {
    test_state_with_sheet(stages_dir, scorer, admin_password, None)
}

/// Like [`test_state`], with the tournament sheet fetched from `sheet`
#[allow(dead_code)]
pub fn test_state_with_sheet(
    stages_dir: PathBuf,
    scorer: Arc<dyn TournamentScorer>,
    admin_password: Option<&str>,
    sheet: Option<SheetClient>,
) -> Arc<AppState> {
    Arc::new(AppState {
        catalog: CatalogService::new(stages_dir, test_manifest(), 3_600),
        scorer,
        sheet,
        admin_password: admin_password.map(str::to_string),
        metrics: MetricsConfig::default(),
    })
}
