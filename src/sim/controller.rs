//! The per-sample motion algorithm and settle handling
//!
//! One entry point per input kind: `handle_sample` folds an accelerometer
//! reading into the state (jerk gate, displacement, clamp, band latch,
//! settle re-arm), `poll_settle` checks the quiet-window deadline. Both
//! take the caller's clock as `now_ms`; nothing in here reads time itself.

use glam::Vec2;
use log::debug;

use super::layout::ScreenLayout;
use super::state::{ControllerState, MotionEvent, MotionSample};
use crate::config::MotionConfig;

/// What one sample did to the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShakeOutcome {
    /// Jerk at or below threshold: sample absorbed with no other effect
    Ignored,
    /// Qualifying shake: the dot retargeted, possibly with a band transition
    Shake {
        /// Jerk magnitude that passed the gate
        speed: f32,
        /// New clamped target position
        target: Vec2,
        /// Band transition, if the in-band predicate flipped
        event: Option<MotionEvent>,
    },
}

/// The motion feedback controller: owns the screen geometry and the
/// single mutable state instance for one session.
#[derive(Debug, Clone)]
pub struct MotionController {
    pub config: MotionConfig,
    pub layout: ScreenLayout,
    pub state: ControllerState,
}

impl MotionController {
    pub fn new(config: MotionConfig) -> Self {
        let layout = ScreenLayout::new(
            config.screen_width,
            config.screen_height,
            config.dot_size,
            config.band_height_frac,
        );
        let state = ControllerState::new(layout.rest_position());
        Self {
            config,
            layout,
            state,
        }
    }

    /// Current authoritative dot position
    pub fn target(&self) -> Vec2 {
        self.state.target
    }

    /// Feed one accelerometer sample at session time `now_ms`.
    ///
    /// Speed is the Euclidean norm of the delta against the previous
    /// sample; the displacement itself uses the raw x/y components scaled
    /// by the shake multiplier. `last_accel` is updated whether or not the
    /// sample qualifies.
    pub fn handle_sample(&mut self, sample: MotionSample, now_ms: u64) -> ShakeOutcome {
        let delta = sample.accel - self.state.last_accel;
        let speed = delta.length();
        self.state.last_accel = sample.accel;

        if speed <= self.config.shake_threshold {
            return ShakeOutcome::Ignored;
        }

        self.state.last_shake_at = now_ms;
        self.state.settle_deadline = Some(now_ms + self.config.settle_after_ms);

        let candidate = self.state.target
            + Vec2::new(sample.accel.x, sample.accel.y) * self.config.shake_multiplier;
        let target = self.layout.clamp_candidate(self.state.target.y, candidate);
        self.state.target = target;

        let event = self.state.apply_hit(self.layout.hit_band(target.y), speed);
        debug!(
            "sample {}ms: shake speed {speed:.2} -> target ({:.1}, {:.1}), {}",
            sample.timestamp_ms,
            target.x,
            target.y,
            match self.state.in_band {
                Some(band) => band.as_str(),
                None => "between bands",
            }
        );

        ShakeOutcome::Shake {
            speed,
            target,
            event,
        }
    }

    /// Check the settle deadline at session time `now_ms`.
    ///
    /// Fires at most once per armed deadline: the dot returns to the rest
    /// position and the band latch clears. The quiet window is re-checked
    /// against `last_shake_at` at fire time (last writer wins), so a shake
    /// that landed between arming and polling pushes the deadline out
    /// instead of being overridden by a stale timer.
    pub fn poll_settle(&mut self, now_ms: u64) -> Option<MotionEvent> {
        let deadline = self.state.settle_deadline?;
        if now_ms < deadline {
            return None;
        }

        let quiet_for = now_ms.saturating_sub(self.state.last_shake_at);
        if quiet_for < self.config.settle_after_ms {
            self.state.settle_deadline =
                Some(self.state.last_shake_at + self.config.settle_after_ms);
            return None;
        }

        self.state.settle_deadline = None;
        let resting = self.layout.rest_position();
        self.state.target = resting;
        self.state.in_band = None;
        debug!("settled to ({:.1}, {:.1})", resting.x, resting.y);
        Some(MotionEvent::Settled { resting })
    }

    /// Next instant `poll_settle` could fire, if a settle is pending
    pub fn settle_deadline(&self) -> Option<u64> {
        self.state.settle_deadline
    }
}
