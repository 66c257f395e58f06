//! Controller state and core motion types
//!
//! Everything the per-sample algorithm reads and writes lives here, as one
//! mutable struct owned by the session. No timers or clocks: callers pass
//! timestamps in, so the state machine stays deterministic.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::layout::Band;
use crate::consts::*;

/// One raw accelerometer reading, in device gravitational units.
///
/// Ephemeral: only the delta against the previous sample matters, plus the
/// raw x/y components for displacement. `timestamp_ms` is the capture time
/// on the source's monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub timestamp_ms: u64,
    pub accel: Vec3,
}

impl MotionSample {
    pub fn new(timestamp_ms: u64, x: f32, y: f32, z: f32) -> Self {
        Self {
            timestamp_ms,
            accel: Vec3::new(x, y, z),
        }
    }
}

/// Feedback strength bucket for a band hit, from the jerk magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImpactTier {
    Light,
    Medium,
    Heavy,
}

impl ImpactTier {
    /// Bucket a jerk magnitude. Cutoffs are exclusive: exactly 2.5 is
    /// still medium, exactly 1.8 still light.
    pub fn from_speed(speed: f32) -> Self {
        if speed > HEAVY_SPEED {
            ImpactTier::Heavy
        } else if speed > MEDIUM_SPEED {
            ImpactTier::Medium
        } else {
            ImpactTier::Light
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactTier::Light => "light",
            ImpactTier::Medium => "medium",
            ImpactTier::Heavy => "heavy",
        }
    }
}

/// Observable state changes produced by the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionEvent {
    /// The dot landed in a band it was not in before
    BandEntered {
        band: Band,
        tier: ImpactTier,
        speed: f32,
    },
    /// The dot left the band it was in (sample-driven, not settling)
    BandExited { band: Band },
    /// The quiet window elapsed and the dot returned to rest
    Settled { resting: Vec2 },
}

/// Mutable controller state, single instance per session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerState {
    /// Previous sample's acceleration, for the jerk delta
    pub last_accel: Vec3,
    /// Authoritative dot position (top-left anchor). Hit tests use this
    /// clamped target, never interpolated animation frames.
    pub target: Vec2,
    /// Which band the target currently sits in. `Some` acts as the
    /// fired-once latch: while set, re-entries of the same band are silent.
    pub in_band: Option<Band>,
    /// Timestamp of the last qualifying shake
    pub last_shake_at: u64,
    /// Pending settle time; re-armed on every qualifying shake
    pub settle_deadline: Option<u64>,
}

impl ControllerState {
    pub fn new(rest: Vec2) -> Self {
        Self {
            last_accel: Vec3::ZERO,
            target: rest,
            in_band: None,
            last_shake_at: 0,
            settle_deadline: None,
        }
    }

    pub fn is_in_band(&self) -> bool {
        self.in_band.is_some()
    }

    /// Fold a hit-test result into the latch and report the transition.
    ///
    /// Entry (none -> some band) reports `BandEntered` with a tier from
    /// `speed`; leaving (some -> none) reports `BandExited`. Staying put,
    /// or moving directly between bands, reports nothing: the latch only
    /// speaks when the in-band predicate itself flips.
    pub fn apply_hit(&mut self, hit: Option<Band>, speed: f32) -> Option<MotionEvent> {
        match (self.in_band, hit) {
            (None, Some(band)) => {
                self.in_band = Some(band);
                Some(MotionEvent::BandEntered {
                    band,
                    tier: ImpactTier::from_speed(speed),
                    speed,
                })
            }
            (Some(band), None) => {
                self.in_band = None;
                Some(MotionEvent::BandExited { band })
            }
            _ => {
                self.in_band = hit;
                None
            }
        }
    }
}
