//! Shake Dot - a shake-driven motion toy
//!
//! Device shaking displaces a dot into one of two screen bands; landing in
//! a band fires tiered haptic, vibration, and sound feedback exactly once
//! per entry, and a quiet second sends the dot gliding back to center.
//!
//! Core modules:
//! - `sim`: Deterministic motion core (geometry, jerk gate, band latch)
//! - `anim`: Spring animation easing the drawn dot toward its target
//! - `sensor`: Sample sources and the scoped subscription guard
//! - `feedback`: Haptic/vibration/sound dispatch with the sound rate gate
//! - `session`: The event loop wiring a source to the sinks
//! - `config`: Tunable parameters, JSON-loadable
//! - `display`: Canvas seam for whatever draws the dot

pub mod anim;
pub mod config;
pub mod display;
pub mod feedback;
pub mod sensor;
pub mod session;
pub mod sim;

pub use config::MotionConfig;
pub use session::{MotionSession, SessionSummary};
pub use sim::{Band, ImpactTier, MotionController, MotionEvent, MotionSample, ShakeOutcome};

/// Motion tuning constants
pub mod consts {
    /// Dot diameter in points; positions anchor its top-left corner
    pub const DOT_SIZE: f32 = 50.0;
    /// Band height as a fraction of screen height
    pub const BAND_HEIGHT_FRAC: f32 = 0.35;

    /// Minimum jerk magnitude for a sample to move the dot
    pub const SHAKE_THRESHOLD: f32 = 1.5;
    /// Points of displacement per unit of raw acceleration
    pub const SHAKE_MULTIPLIER: f32 = 70.0;

    /// Jerk magnitude above which a hit is medium strength
    pub const MEDIUM_SPEED: f32 = 1.8;
    /// Jerk magnitude above which a hit is heavy
    pub const HEAVY_SPEED: f32 = 2.5;

    /// Quiet window before the dot settles back to rest
    pub const SETTLE_AFTER_MS: u64 = 1000;
    /// Minimum gap between hit-sound playback starts
    pub const SOUND_GAP_MS: u64 = 229;

    /// Default portrait phone screen
    pub const DEFAULT_SCREEN_WIDTH: f32 = 390.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 844.0;

    /// Spring-damper tuning for the dot animation
    pub const SPRING_STIFFNESS: f32 = 150.0;
    pub const SPRING_DAMPING: f32 = 8.0;

    /// Animation/poll cadence of the session loop
    pub const FRAME_INTERVAL_MS: u64 = 16;
}
