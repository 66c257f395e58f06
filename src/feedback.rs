//! Haptic, vibration, and sound dispatch for band hits
//!
//! Sinks are fire-and-forget and best-effort: a missing or failing backend
//! loses feedback, never errors. Sound playback passes through a rate gate
//! so rapid repeated hits cannot exhaust the audio resource; haptics and
//! vibration are not gated.

use log::debug;

use crate::sim::{ImpactTier, MotionEvent};

/// Vibration patterns: alternating wait/vibrate segments in ms, leading
/// wait first, matched to the impact tiers
pub const HEAVY_PATTERN: &[u64] = &[0, 100, 50, 100];
pub const MEDIUM_PATTERN: &[u64] = &[0, 70, 40, 70];
pub const LIGHT_PATTERN: &[u64] = &[0, 30];

/// The vibration pattern for a tier
pub fn vibration_pattern(tier: ImpactTier) -> &'static [u64] {
    match tier {
        ImpactTier::Heavy => HEAVY_PATTERN,
        ImpactTier::Medium => MEDIUM_PATTERN,
        ImpactTier::Light => LIGHT_PATTERN,
    }
}

/// Haptic and vibration output
pub trait Haptics {
    /// One haptic impact at the given strength
    fn impact(&mut self, tier: ImpactTier);
    /// Start a vibration pattern (wait/vibrate ms segments)
    fn vibrate(&mut self, pattern: &[u64]);
    /// Stop any ongoing vibration
    fn cancel_vibration(&mut self);
}

/// Hit-sound output. Loading and releasing the underlying audio resource
/// around each play is the implementation's business.
pub trait HitSound {
    fn play(&mut self);
}

/// Rate limiter on sound playback starts
#[derive(Debug, Clone, Copy, Default)]
pub struct SoundGate {
    last_play_at: Option<u64>,
}

impl SoundGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass when strictly more than `min_gap_ms` has elapsed since the
    /// previous pass (or on the first call). Records the start on pass.
    pub fn try_pass(&mut self, now_ms: u64, min_gap_ms: u64) -> bool {
        match self.last_play_at {
            Some(last) if now_ms.saturating_sub(last) <= min_gap_ms => false,
            _ => {
                self.last_play_at = Some(now_ms);
                true
            }
        }
    }
}

/// Routes controller events to the output sinks.
///
/// Band entries fan out to haptic impact + pattern vibration + gated sound;
/// band exits cancel vibration; settling touches no sink (the dot drifting
/// home is silent).
pub struct Feedback<H: Haptics, S: HitSound> {
    pub haptics: H,
    pub sound: S,
    gate: SoundGate,
    sound_gap_ms: u64,
}

impl<H: Haptics, S: HitSound> Feedback<H, S> {
    pub fn new(haptics: H, sound: S, sound_gap_ms: u64) -> Self {
        Self {
            haptics,
            sound,
            gate: SoundGate::new(),
            sound_gap_ms,
        }
    }

    /// Dispatch one controller event at session time `now_ms`
    pub fn apply(&mut self, event: &MotionEvent, now_ms: u64) {
        match event {
            MotionEvent::BandEntered { tier, .. } => self.band_entered(*tier, now_ms),
            MotionEvent::BandExited { .. } => self.band_exited(),
            MotionEvent::Settled { .. } => {}
        }
    }

    pub fn band_entered(&mut self, tier: ImpactTier, now_ms: u64) {
        self.haptics.impact(tier);
        self.haptics.vibrate(vibration_pattern(tier));
        if self.gate.try_pass(now_ms, self.sound_gap_ms) {
            self.sound.play();
        } else {
            debug!("hit sound suppressed ({}ms gate)", self.sound_gap_ms);
        }
    }

    pub fn band_exited(&mut self) {
        self.haptics.cancel_vibration();
    }
}

/// Log-only haptics for headless runs
#[derive(Debug, Default)]
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn impact(&mut self, tier: ImpactTier) {
        debug!("haptic impact: {}", tier.as_str());
    }

    fn vibrate(&mut self, pattern: &[u64]) {
        debug!("vibrate {pattern:?}");
    }

    fn cancel_vibration(&mut self) {
        debug!("vibration cancelled");
    }
}

/// Log-only hit sound for headless runs
#[derive(Debug, Default)]
pub struct LogSound;

impl HitSound for LogSound {
    fn play(&mut self) {
        debug!("hit sound");
    }
}
