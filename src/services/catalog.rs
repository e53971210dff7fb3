use futures::future::try_join_all;
use moka::future::Cache;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::geometry::{normalize, SourceFormat};
use crate::models::{DistanceKm, Stage, StageKind};

/// One entry of the stage manifest: which file backs which stage.
#[derive(Debug, Clone)]
pub struct StageFile {
    pub id: u32,
    pub name: String,
    pub file: String,
    pub kind: StageKind,
    pub description: Option<String>,
}

impl StageFile {
    pub fn new(id: u32, name: &str, file: &str, kind: StageKind, description: Option<&str>) -> Self {
        StageFile {
            id,
            name: name.to_string(),
            file: file.to_string(),
            kind,
            description: description.map(str::to_string),
        }
    }
}

/// The raid itinerary, in display order.
pub fn default_manifest() -> Vec<StageFile> {
    vec![
        StageFile::new(1, "Pre-Uniraid", "XX-barcelona-algeciras.kml", StageKind::Trip, Some("Barcelona → Algeciras")),
        StageFile::new(2, "Etapa 0", "00-algeciras-azrou.kml", StageKind::Trip, Some("Algeciras → Azrou")),
        StageFile::new(3, "Etapa 1", "01-azrou-errachidia.kml", StageKind::Stage, Some("Azrou → Errachidia")),
        StageFile::new(4, "Etapa 2", "02-errachidia-erg-chebbi.kml", StageKind::Stage, Some("Errachidia → Erg Chebbi")),
        StageFile::new(5, "Etapa 4-5", "05-erg-chebbi-nkob.kml", StageKind::Stage, Some("Erg Chebbi → Nkob")),
        StageFile::new(6, "Etapa 6", "06-nkob-marrakech.kml", StageKind::Stage, Some("Nkob → Marrakech")),
    ]
}

/// Read and normalize every manifest entry under `dir`.
///
/// The catalog is all-or-nothing: the first entry that cannot be read or
/// parsed fails the whole load, naming the offending file. Stages keep
/// manifest order.
pub async fn load_catalog(dir: &Path, entries: &[StageFile]) -> Result<Vec<Stage>> {
    let stages = try_join_all(entries.iter().map(|entry| load_stage(dir, entry))).await?;

    tracing::info!(
        stages = stages.len(),
        total_km = total_catalog_km(&stages).as_km(),
        "Stage catalog loaded from {}",
        dir.display()
    );

    Ok(stages)
}

async fn load_stage(dir: &Path, entry: &StageFile) -> Result<Stage> {
    let path = dir.join(&entry.file);

    let text = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| AppError::CatalogLoad {
            file: entry.file.clone(),
            reason: e.to_string(),
        })?;

    let route = normalize(&text, SourceFormat::from_path(&path)).map_err(|e| {
        AppError::CatalogLoad {
            file: entry.file.clone(),
            reason: e.to_string(),
        }
    })?;

    tracing::debug!(
        stage_id = entry.id,
        points = route.len(),
        km = route.distance_km().as_km(),
        "Loaded stage {} from {}",
        entry.name,
        entry.file
    );

    Ok(Stage {
        id: entry.id,
        name: entry.name.clone(),
        kind: entry.kind,
        description: entry.description.clone(),
        route,
    })
}

/// Combined length of every stage in the catalog.
pub fn total_catalog_km(stages: &[Stage]) -> DistanceKm {
    stages.iter().map(|s| s.route.distance_km()).sum()
}

/// Serves the stage catalog, re-reading the source files at most once per
/// revalidation window. Failed loads are not cached.
#[derive(Clone)]
pub struct CatalogService {
    dir: PathBuf,
    manifest: Arc<[StageFile]>,
    cache: Cache<(), Arc<Vec<Stage>>>,
}

impl CatalogService {
    pub fn new(dir: PathBuf, manifest: Vec<StageFile>, revalidate_secs: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(revalidate_secs))
            .max_capacity(1)
            .build();

        CatalogService {
            dir,
            manifest: manifest.into(),
            cache,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn stages(&self) -> Result<Arc<Vec<Stage>>> {
        self.cache
            .try_get_with((), async {
                load_catalog(&self.dir, &self.manifest).await.map(Arc::new)
            })
            .await
            .map_err(|e| (*e).clone())
    }

    pub async fn stage(&self, id: u32) -> Result<Stage> {
        let stages = self.stages().await?;
        stages
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Stage {} not found", id)))
    }

    /// Drop the cached catalog so the next request re-reads the files.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }
}
