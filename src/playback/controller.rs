//! Route playback state machine.
//!
//! The controller is a plain value owned by one map session. It never reads
//! the clock itself: every transition takes `now`, and every camera move is
//! queued as a [`CameraCommand`] that the caller drains and forwards to the
//! renderer. This keeps the reveal and flyover logic deterministic and lets
//! the async [`PlaybackDriver`](crate::playback::PlaybackDriver) supply real
//! time.
//!
//! ```text
//!            select_stage                    tick (p == 1)
//!   Idle ───────────────▶ RevealAnimating ──────────────▶ RevealComplete
//!    ▲                                                      │      ▲
//!    │ select_all (from any state)           toggle_flyover │      │ toggle_flyover (cancel)
//!    │                                                      ▼      │ or progress == 1
//!    └──────────────────────────────── FlyoverPreloading ──▶ FlyoverActive
//!                                          preload_resolved
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::PlaybackConfig;
use crate::geometry::total_distance_km;
use crate::models::{BoundingBox, DistanceKm, LngLat, Stage};
use crate::playback::{CameraCommand, ViewportFitter};

/// Observable playback phase, without the per-phase bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    RevealAnimating,
    RevealComplete,
    FlyoverPreloading,
    FlyoverActive,
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    RevealAnimating {
        started_at: Instant,
    },
    RevealComplete,
    FlyoverPreloading {
        ticket: PreloadTicket,
    },
    FlyoverActive {
        progress: f64,
        last_tick: Instant,
        total_km: DistanceKm,
    },
}

/// Identifies one flyover preload. A ticket from a superseded preload no
/// longer resolves anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadTicket(u64);

/// Flyover parameters exposed while a flyover is running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyoverState {
    pub progress: f64,
    pub zoom: f64,
    pub speed_kmh: f64,
}

/// Point-in-time view of a session's playback.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub stage_id: Option<u32>,
    pub drawn_points: usize,
    pub drawn_km: DistanceKm,
    pub flyover: Option<FlyoverState>,
}

/// Fraction of a fixed-duration reveal completed after `elapsed`.
pub fn reveal_fraction(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}

/// Number of route points to draw at `fraction` of the way through.
/// At least one point is drawn for any non-empty route.
pub fn revealed_count(fraction: f64, total_points: usize) -> usize {
    if total_points == 0 {
        return 0;
    }
    let count = (fraction.clamp(0.0, 1.0) * total_points as f64).floor() as usize;
    count.max(1).min(total_points)
}

/// Progress gained along a route of `total_km` when travelling at
/// `speed_kmh` for `elapsed` of real time, scaled by `speedup`.
pub fn flyover_step(speed_kmh: f64, elapsed: Duration, speedup: f64, total_km: DistanceKm) -> f64 {
    let simulated_km = speed_kmh * (elapsed.as_secs_f64() / 3600.0) * speedup;
    simulated_km / total_km.or_unit()
}

pub struct PlaybackController {
    config: PlaybackConfig,
    stages: Arc<[Stage]>,
    selected: Option<usize>,
    phase: Phase,
    drawn: usize,
    speed_kmh: f64,
    zoom: f64,
    generation: u64,
    fitter: ViewportFitter,
    outbox: Vec<CameraCommand>,
}

impl PlaybackController {
    /// An invalid `config` is replaced by the defaults.
    pub fn new(stages: impl Into<Arc<[Stage]>>, config: PlaybackConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid playback config, using defaults");
                PlaybackConfig::default()
            }
        };
        let fitter = ViewportFitter::new(config.fit_duration_ms);
        let speed_kmh = config.default_speed_kmh.clamp(config.min_speed_kmh, config.max_speed_kmh);
        let zoom = config.default_zoom.clamp(config.min_zoom, config.max_zoom);

        PlaybackController {
            config,
            stages: stages.into(),
            selected: None,
            phase: Phase::Idle,
            drawn: 0,
            speed_kmh,
            zoom,
            generation: 0,
            fitter,
            outbox: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn status(&self) -> PlaybackStatus {
        match self.phase {
            Phase::Idle => PlaybackStatus::Idle,
            Phase::RevealAnimating { .. } => PlaybackStatus::RevealAnimating,
            Phase::RevealComplete => PlaybackStatus::RevealComplete,
            Phase::FlyoverPreloading { .. } => PlaybackStatus::FlyoverPreloading,
            Phase::FlyoverActive { .. } => PlaybackStatus::FlyoverActive,
        }
    }

    /// Whether a frame loop should be running.
    pub fn is_animating(&self) -> bool {
        matches!(
            self.phase,
            Phase::RevealAnimating { .. } | Phase::FlyoverActive { .. }
        )
    }

    /// Bumped whenever an in-flight loop must stop applying frames.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn selected_stage(&self) -> Option<&Stage> {
        self.selected.and_then(|i| self.stages.get(i))
    }

    fn selected_coords(&self) -> &[LngLat] {
        self.selected_stage()
            .map(|s| s.route.coords())
            .unwrap_or(&[])
    }

    /// The revealed prefix of the selected stage's route.
    pub fn drawn_coords(&self) -> &[LngLat] {
        let coords = self.selected_coords();
        &coords[..self.drawn.min(coords.len())]
    }

    /// Length of the revealed prefix.
    pub fn drawn_km(&self) -> DistanceKm {
        total_distance_km(self.drawn_coords())
    }

    /// Full length of the selected stage, zero in the aggregate view.
    pub fn stage_km(&self) -> DistanceKm {
        self.selected_stage()
            .map(|s| s.route.distance_km())
            .unwrap_or(DistanceKm::ZERO)
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn flyover_progress(&self) -> Option<f64> {
        match self.phase {
            Phase::FlyoverActive { progress, .. } => Some(progress),
            Phase::FlyoverPreloading { .. } => Some(0.0),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.status(),
            stage_id: self.selected_stage().map(|s| s.id),
            drawn_points: self.drawn_coords().len(),
            drawn_km: self.drawn_km(),
            flyover: self.flyover_progress().map(|progress| FlyoverState {
                progress,
                zoom: self.zoom,
                speed_kmh: self.speed_kmh,
            }),
        }
    }

    /// Take every camera command queued since the last drain, oldest first.
    pub fn drain_commands(&mut self) -> Vec<CameraCommand> {
        std::mem::take(&mut self.outbox)
    }

    // ---------------------------------------------------------------------
    // Inputs
    // ---------------------------------------------------------------------

    /// The map renderer finished mounting; replays any parked viewport fit.
    pub fn renderer_ready(&mut self) {
        if let Some(cmd) = self.fitter.renderer_ready() {
            self.outbox.push(cmd);
        }
    }

    /// Select one stage and restart its reveal from the first coordinate.
    /// Returns `false` (and changes nothing) for an unknown id.
    pub fn select_stage(&mut self, stage_id: u32, now: Instant) -> bool {
        let Some(index) = self.stages.iter().position(|s| s.id == stage_id) else {
            tracing::warn!(stage_id, "Ignoring selection of unknown stage");
            return false;
        };

        self.generation += 1;
        self.selected = Some(index);
        self.phase = Phase::RevealAnimating { started_at: now };
        self.drawn = 1;

        let stages = Arc::clone(&self.stages);
        let padding = self.config.fit_padding;
        if let Some(cmd) = self.fitter.fit_to(stages[index].route.coords(), padding) {
            self.outbox.push(cmd);
        }

        tracing::debug!(stage_id, generation = self.generation, "Stage selected");
        true
    }

    /// Switch to the aggregate view of every stage, stopping any animation.
    pub fn select_all(&mut self) {
        self.generation += 1;
        self.selected = None;
        self.phase = Phase::Idle;
        self.drawn = 0;

        let all: Vec<LngLat> = self
            .stages
            .iter()
            .flat_map(|s| s.route.coords().iter().copied())
            .collect();
        let padding = self.config.fit_padding;
        if let Some(cmd) = self.fitter.fit_to(&all, padding) {
            self.outbox.push(cmd);
        }

        tracing::debug!(generation = self.generation, "Aggregate view selected");
    }

    pub fn set_speed(&mut self, speed_kmh: f64) {
        if speed_kmh.is_finite() {
            self.speed_kmh = speed_kmh.clamp(self.config.min_speed_kmh, self.config.max_speed_kmh);
        }
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.config.min_zoom, self.config.max_zoom);
        }
    }

    /// Start or cancel a flyover.
    ///
    /// A running (or preloading) flyover stops at once and the full route is
    /// shown again. From a completed reveal the camera jumps to the route
    /// start and a [`PreloadTicket`] is returned; the caller resolves it with
    /// [`preload_resolved`](Self::preload_resolved) once the renderer settles
    /// or the preload timeout expires.
    pub fn toggle_flyover(&mut self, _now: Instant) -> Option<PreloadTicket> {
        match self.phase {
            Phase::FlyoverActive { .. } | Phase::FlyoverPreloading { .. } => {
                self.generation += 1;
                self.phase = Phase::RevealComplete;
                self.drawn = self.selected_coords().len();
                tracing::debug!("Flyover cancelled");
                None
            }
            Phase::RevealComplete => {
                let first = self.selected_coords().first().copied()?;

                self.generation += 1;
                let ticket = PreloadTicket(self.generation);
                self.phase = Phase::FlyoverPreloading { ticket };
                self.outbox.push(CameraCommand::JumpTo {
                    center: first,
                    zoom: self.zoom,
                    pitch: self.config.flyover_pitch,
                });

                tracing::debug!(
                    zoom = self.zoom,
                    speed_kmh = self.speed_kmh,
                    "Flyover preloading"
                );
                Some(ticket)
            }
            Phase::Idle | Phase::RevealAnimating { .. } => None,
        }
    }

    /// Resolve a preload. Only the first resolution of the current ticket
    /// starts the flyover; later or stale calls return `false`.
    pub fn preload_resolved(&mut self, ticket: PreloadTicket, now: Instant) -> bool {
        match self.phase {
            Phase::FlyoverPreloading { ticket: current } if current == ticket => {
                let total_km = total_distance_km(self.selected_coords());
                self.phase = Phase::FlyoverActive {
                    progress: 0.0,
                    last_tick: now,
                    total_km,
                };
                self.drawn = 1;
                tracing::debug!(total_km = total_km.as_km(), "Flyover started");
                true
            }
            _ => false,
        }
    }

    /// Advance one animation frame. Returns whether another frame is needed.
    ///
    /// A tick with nothing to draw (no stage, empty route) is a no-op.
    pub fn tick(&mut self, now: Instant) -> bool {
        let total_points = self.selected_coords().len();

        match self.phase {
            Phase::RevealAnimating { started_at } => {
                if total_points == 0 {
                    self.drawn = 0;
                    return false;
                }

                let fraction = reveal_fraction(
                    now.saturating_duration_since(started_at),
                    self.config.reveal_duration(),
                );
                self.drawn = revealed_count(fraction, total_points);

                if fraction >= 1.0 {
                    self.drawn = total_points;
                    self.phase = Phase::RevealComplete;
                    return false;
                }
                true
            }
            Phase::FlyoverActive {
                progress,
                last_tick,
                total_km,
            } => {
                if total_points == 0 {
                    self.drawn = 0;
                    return false;
                }

                let speed = self.speed_kmh.max(self.config.min_speed_kmh);
                let step = flyover_step(
                    speed,
                    now.saturating_duration_since(last_tick),
                    self.config.speedup_factor,
                    total_km,
                );
                let progress = (progress + step).min(1.0);
                self.drawn = revealed_count(progress, total_points);

                let center = self.selected_coords()[self.drawn - 1];

                self.outbox.push(CameraCommand::EaseTo {
                    center,
                    zoom: self.zoom,
                    pitch: self.config.flyover_pitch,
                    duration_ms: 0,
                });

                if progress >= 1.0 {
                    let overview_center = route_center(self.selected_coords());
                    self.finish_flyover(total_points, overview_center);
                    return false;
                }

                self.phase = Phase::FlyoverActive {
                    progress,
                    last_tick: now,
                    total_km,
                };
                true
            }
            Phase::Idle | Phase::RevealComplete | Phase::FlyoverPreloading { .. } => false,
        }
    }

    fn finish_flyover(&mut self, total_points: usize, overview_center: Option<LngLat>) {
        self.phase = Phase::RevealComplete;
        self.drawn = total_points;

        if let Some(center) = overview_center {
            self.outbox.push(CameraCommand::EaseTo {
                center,
                zoom: self.config.overview_zoom,
                pitch: self.config.overview_pitch,
                duration_ms: self.config.overview_duration_ms,
            });
        }
        tracing::debug!("Flyover complete");
    }
}

fn route_center(coords: &[LngLat]) -> Option<LngLat> {
    BoundingBox::from_path(coords).ok().map(|b| b.center())
}
