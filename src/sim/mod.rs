//! Deterministic motion core
//!
//! The whole hit/feedback state machine lives here. This module must stay
//! pure and deterministic:
//! - Timestamps are passed in by the caller, never read from a clock
//! - No I/O, no platform dependencies, no sinks
//!
//! Platform concerns (sensor feeds, haptics, sound, drawing) sit outside
//! and consume what this module produces.

pub mod controller;
pub mod layout;
pub mod state;

pub use controller::{MotionController, ShakeOutcome};
pub use layout::{Band, BandRect, ScreenLayout};
pub use state::{ControllerState, ImpactTier, MotionEvent, MotionSample};
