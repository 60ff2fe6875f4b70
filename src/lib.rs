//! Goora - A tilt-steered racing trivia game
//!
//! Core modules:
//! - `sim`: Deterministic core (tilt steering, car/camera motion, quiz state machine)
//! - `race`: Wiring of the core into one scene with cue dispatch and timers
//! - `audio`: Cue dispatch (procedural Web Audio on wasm)
//! - `renderer`: Frame contract handed to the external scene graph
//! - `platform`: Scoped repeating tasks and event listeners
//! - `settings`: Persisted difficulty

pub mod audio;
pub mod platform;
pub mod race;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use race::{CountdownCommand, HeadlessRace, Race, RaceError};
pub use settings::Settings;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Steering delta per degree of lateral tilt
    pub const TILT_SCALE: f32 = 0.1;

    /// Camera tick period (~60 Hz)
    pub const CAMERA_TICK_MS: u32 = 16;
    /// Fraction of the remaining distance the camera covers each tick
    pub const CAMERA_SMOOTHING: f32 = 0.1;
    /// Camera position relative to the car
    pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 2.0, 5.0);
    /// Where the camera sits before the first tick
    pub const CAMERA_START: Vec3 = Vec3::new(0.0, 2.0, 5.0);

    /// Countdown tick period (one second per tick)
    pub const COUNTDOWN_TICK_MS: u32 = 1000;

    /// Uniform scale applied to the car model
    pub const CAR_MODEL_SCALE: f32 = 0.9;
}

/// Exponential smoothing step: move `current` a fraction `t` of the way to `target`
#[inline]
pub fn smooth_toward(current: Vec3, target: Vec3, t: f32) -> Vec3 {
    current.lerp(target, t.clamp(0.0, 1.0))
}
