pub mod catalog;
pub mod metrics;
pub mod scoring;
pub mod sheets;

pub use catalog::{default_manifest, load_catalog, CatalogService, StageFile};
pub use scoring::{PythonScorer, ScorerError, TournamentScorer};
pub use sheets::SheetClient;
