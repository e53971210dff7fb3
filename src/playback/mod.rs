//! Map playback: progressive route reveal, simulated flyover and viewport
//! fitting, driven by a clock and emitted as renderer-agnostic camera
//! commands.

pub mod camera;
pub mod controller;
pub mod driver;
pub mod preload;
pub mod viewport;

pub use camera::CameraCommand;
pub use controller::{
    flyover_step, reveal_fraction, revealed_count, FlyoverState, PlaybackController,
    PlaybackSnapshot, PlaybackStatus, PreloadTicket,
};
pub use driver::PlaybackDriver;
pub use preload::{wait_for_settle, PreloadOutcome};
pub use viewport::ViewportFitter;
