use crate::models::{BoundingBox, LngLat};
use crate::playback::CameraCommand;

/// Reframes the map around a coordinate set whenever the selection changes.
///
/// Requests made before the renderer is ready are parked and replayed by
/// [`ViewportFitter::renderer_ready`]; only the latest one is kept.
#[derive(Debug, Clone)]
pub struct ViewportFitter {
    duration_ms: u64,
    ready: bool,
    pending: Option<(BoundingBox, f64)>,
}

impl ViewportFitter {
    pub fn new(duration_ms: u64) -> Self {
        ViewportFitter {
            duration_ms,
            ready: false,
            pending: None,
        }
    }

    /// Build a fit-bounds command for `coords`. Returns `None` when the set is
    /// empty or the renderer is not mounted yet.
    pub fn fit_to(&mut self, coords: &[LngLat], padding: f64) -> Option<CameraCommand> {
        let bounds = match BoundingBox::from_path(coords) {
            Ok(bounds) => bounds,
            Err(e) => {
                tracing::debug!("Skipping viewport fit: {}", e);
                return None;
            }
        };

        if !self.ready {
            self.pending = Some((bounds, padding));
            return None;
        }

        Some(self.command(bounds, padding))
    }

    /// Mark the renderer as mounted and replay the last parked fit, if any.
    pub fn renderer_ready(&mut self) -> Option<CameraCommand> {
        self.ready = true;
        self.pending
            .take()
            .map(|(bounds, padding)| self.command(bounds, padding))
    }

    fn command(&self, bounds: BoundingBox, padding: f64) -> CameraCommand {
        CameraCommand::FitBounds {
            bounds,
            padding,
            duration_ms: self.duration_ms,
        }
    }
}
