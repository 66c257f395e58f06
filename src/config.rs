//! Tunable motion parameters
//!
//! One flat struct covering screen geometry, the shake gate, and the
//! feedback timing windows. Loadable from a JSON file; missing fields fall
//! back to the defaults, a missing or unreadable file falls back entirely.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::consts::*;

/// Motion controller tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    // === Screen ===
    /// Screen width in points
    pub screen_width: f32,
    /// Screen height in points
    pub screen_height: f32,
    /// Dot diameter in points
    pub dot_size: f32,
    /// Band height as a fraction of screen height
    pub band_height_frac: f32,

    // === Shake gate ===
    /// Minimum jerk magnitude for a sample to displace the dot
    pub shake_threshold: f32,
    /// Points of displacement per unit of raw acceleration
    pub shake_multiplier: f32,

    // === Timing ===
    /// Quiet window before the dot settles back to rest (ms)
    pub settle_after_ms: u64,
    /// Minimum gap between hit-sound playback starts (ms)
    pub sound_gap_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            // Screen - portrait phone
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            dot_size: DOT_SIZE,
            band_height_frac: BAND_HEIGHT_FRAC,

            // Shake gate
            shake_threshold: SHAKE_THRESHOLD,
            shake_multiplier: SHAKE_MULTIPLIER,

            // Timing
            settle_after_ms: SETTLE_AFTER_MS,
            sound_gap_ms: SOUND_GAP_MS,
        }
    }
}

impl MotionConfig {
    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(err) => {
                    log::warn!("Bad config at {}: {err}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Cannot read {}: {err}, using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MotionConfig::default();
        assert_eq!(config.dot_size, 50.0);
        assert_eq!(config.shake_threshold, 1.5);
        assert_eq!(config.shake_multiplier, 70.0);
        assert_eq!(config.band_height_frac, 0.35);
        assert_eq!(config.settle_after_ms, 1000);
        assert_eq!(config.sound_gap_ms, 229);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: MotionConfig =
            serde_json::from_str(r#"{"shake_threshold": 2.0, "screen_width": 800.0}"#)
                .expect("valid json");
        assert_eq!(config.shake_threshold, 2.0);
        assert_eq!(config.screen_width, 800.0);
        // Untouched fields keep their defaults
        assert_eq!(config.shake_multiplier, 70.0);
        assert_eq!(config.settle_after_ms, 1000);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let config = MotionConfig::load_or_default(Path::new("/nonexistent/motion.json"));
        assert_eq!(config, MotionConfig::default());
    }
}
