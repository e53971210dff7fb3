use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::PlaybackConfig;
use crate::models::Stage;
use crate::playback::controller::{
    PlaybackController, PlaybackSnapshot, PlaybackStatus, PreloadTicket,
};
use crate::playback::preload::{wait_for_settle, PreloadOutcome};
use crate::playback::CameraCommand;

fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

/// Runs a [`PlaybackController`] against the tokio clock.
///
/// Every camera command the controller produces is forwarded on the channel
/// returned by [`PlaybackDriver::new`]. At most one background task (frame
/// loop or flyover preload) is alive at a time; starting a new one aborts the
/// previous, and each task also re-checks the controller generation before
/// applying a frame.
pub struct PlaybackDriver {
    controller: Arc<Mutex<PlaybackController>>,
    commands: mpsc::UnboundedSender<CameraCommand>,
    settled: watch::Sender<u64>,
    task: Option<JoinHandle<()>>,
    frame_interval: Duration,
    preload_timeout: Duration,
}

impl PlaybackDriver {
    pub fn new(
        stages: impl Into<Arc<[Stage]>>,
        config: PlaybackConfig,
    ) -> (Self, mpsc::UnboundedReceiver<CameraCommand>) {
        let (commands, rx) = mpsc::unbounded_channel();
        let (settled, _) = watch::channel(0);
        let frame_interval = config.frame_interval();
        let preload_timeout = config.preload_timeout();

        let driver = PlaybackDriver {
            controller: Arc::new(Mutex::new(PlaybackController::new(stages, config))),
            commands,
            settled,
            task: None,
            frame_interval,
            preload_timeout,
        };
        (driver, rx)
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.controller.lock().await.snapshot()
    }

    pub async fn renderer_ready(&self) {
        let mut ctrl = self.controller.lock().await;
        ctrl.renderer_ready();
        forward(&mut ctrl, &self.commands);
    }

    /// The renderer finished loading everything in view.
    pub fn render_settled(&self) {
        self.settled.send_modify(|n| *n = n.wrapping_add(1));
    }

    pub async fn select_stage(&mut self, stage_id: u32) -> bool {
        let mut ctrl = self.controller.lock().await;
        if !ctrl.select_stage(stage_id, now()) {
            return false;
        }
        forward(&mut ctrl, &self.commands);
        let generation = ctrl.generation();
        drop(ctrl);

        self.replace_task(tokio::spawn(run_frames(
            Arc::clone(&self.controller),
            self.commands.clone(),
            self.frame_interval,
            generation,
        )));
        true
    }

    pub async fn select_all(&mut self) {
        self.stop();
        let mut ctrl = self.controller.lock().await;
        ctrl.select_all();
        forward(&mut ctrl, &self.commands);
    }

    /// Start a flyover (after a completed reveal) or cancel a running one.
    pub async fn toggle_flyover(&mut self) {
        let mut ctrl = self.controller.lock().await;
        let was_flying = matches!(
            ctrl.status(),
            PlaybackStatus::FlyoverPreloading | PlaybackStatus::FlyoverActive
        );
        let ticket = ctrl.toggle_flyover(now());
        forward(&mut ctrl, &self.commands);
        let generation = ctrl.generation();
        drop(ctrl);

        match ticket {
            Some(ticket) => {
                // Subscribe before spawning so a settle reported right after
                // the jump is not missed.
                let settled = self.settled.subscribe();
                self.replace_task(tokio::spawn(run_flyover(
                    Arc::clone(&self.controller),
                    self.commands.clone(),
                    settled,
                    self.preload_timeout,
                    self.frame_interval,
                    ticket,
                    generation,
                )));
            }
            None if was_flying => self.stop(),
            None => {}
        }
    }

    pub async fn set_speed(&self, speed_kmh: f64) {
        self.controller.lock().await.set_speed(speed_kmh);
    }

    pub async fn set_zoom(&self, zoom: f64) {
        self.controller.lock().await.set_zoom(zoom);
    }

    /// Whether a frame loop or preload is still in flight.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn replace_task(&mut self, task: JoinHandle<()>) {
        if let Some(previous) = self.task.replace(task) {
            previous.abort();
        }
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

fn forward(ctrl: &mut PlaybackController, commands: &mpsc::UnboundedSender<CameraCommand>) {
    for cmd in ctrl.drain_commands() {
        if commands.send(cmd).is_err() {
            tracing::debug!("Camera command receiver dropped");
            return;
        }
    }
}

async fn run_frames(
    controller: Arc<Mutex<PlaybackController>>,
    commands: mpsc::UnboundedSender<CameraCommand>,
    interval: Duration,
    generation: u64,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        let mut ctrl = controller.lock().await;
        if ctrl.generation() != generation {
            return;
        }
        let more = ctrl.tick(now());
        forward(&mut ctrl, &commands);
        if !more {
            return;
        }
    }
}

async fn run_flyover(
    controller: Arc<Mutex<PlaybackController>>,
    commands: mpsc::UnboundedSender<CameraCommand>,
    mut settled: watch::Receiver<u64>,
    timeout: Duration,
    interval: Duration,
    ticket: PreloadTicket,
    generation: u64,
) {
    let outcome = wait_for_settle(&mut settled, timeout).await;
    if outcome == PreloadOutcome::TimedOut {
        tracing::debug!(timeout_ms = timeout.as_millis() as u64, "Preload timed out");
    }

    {
        let mut ctrl = controller.lock().await;
        if !ctrl.preload_resolved(ticket, now()) {
            return;
        }
    }

    run_frames(controller, commands, interval, generation).await;
}
