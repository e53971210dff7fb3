pub mod bounds;
pub mod coordinates;
pub mod distance;
pub mod metrics;
pub mod route;
pub mod stage;
pub mod tournament;

pub use bounds::BoundingBox;
pub use coordinates::LngLat;
pub use distance::DistanceKm;
pub use metrics::Metrics;
pub use route::Route;
pub use stage::{Stage, StageKind, StagesResponse};
