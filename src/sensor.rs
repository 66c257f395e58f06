//! Accelerometer sources
//!
//! Push-based: a source spawns a producer thread that stamps readings and
//! sends them into an mpsc channel. The returned `Subscription` is a scoped
//! guard in the RAII sense: dropping it flags the producer to stop and joins
//! it, so a session teardown can never leak a thread.
//!
//! Two sources ship: a seeded synthetic shaker for demos and a recorded
//! trace replayer for repeatable runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::Vec3;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::sim::MotionSample;

pub type Result<T> = std::result::Result<T, SensorError>;

/// Failures while acquiring a sample stream. Delivery itself never errors;
/// a closed channel just ends the producer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SensorError {
    /// The source already handed out its subscription
    #[error("source is already subscribed")]
    AlreadySubscribed,
    /// A replay source was built with no samples to deliver
    #[error("replay trace is empty")]
    EmptyTrace,
}

/// A push-based accelerometer.
///
/// `subscribe` starts delivery into `tx` and hands back the guard keeping
/// the producer alive. Capture timestamps count milliseconds from the
/// moment of subscription. Sources are one-shot: a second subscribe fails.
pub trait SampleSource {
    fn subscribe(&mut self, tx: Sender<MotionSample>) -> Result<Subscription>;
}

/// Scoped sensor subscription: stops the producer and joins it on drop
pub struct Subscription {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    fn new(stop: Arc<AtomicBool>, handle: JoinHandle<()>) -> Self {
        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Ask the producer to stop without waiting for it
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Synthetic shake tuning
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// RNG seed, so runs repeat exactly
    pub seed: u64,
    /// Gap between samples (ms)
    pub interval_ms: u64,
    /// Consecutive strong samples per shake burst
    pub burst_len: u32,
    /// Near-still samples between bursts; long enough for a settle window
    pub quiet_len: u32,
    /// Total samples before the source finishes on its own
    pub total: u32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            interval_ms: 50,
            burst_len: 8,
            quiet_len: 30,
            total: 200,
        }
    }
}

/// Deterministic fake accelerometer: bursts of hard shaking separated by
/// quiet stretches, from a seeded PCG stream.
#[derive(Debug)]
pub struct SyntheticAccelerometer {
    config: SyntheticConfig,
    subscribed: bool,
}

impl SyntheticAccelerometer {
    pub fn new(config: SyntheticConfig) -> Self {
        Self {
            config,
            subscribed: false,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SyntheticConfig::default())
    }
}

impl SampleSource for SyntheticAccelerometer {
    fn subscribe(&mut self, tx: Sender<MotionSample>) -> Result<Subscription> {
        if self.subscribed {
            return Err(SensorError::AlreadySubscribed);
        }
        self.subscribed = true;

        let config = self.config.clone();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut rng = Pcg32::seed_from_u64(config.seed);
            let start = Instant::now();
            let cycle = config.burst_len + config.quiet_len;
            let mut sent = 0u32;

            while sent < config.total && !stop_flag.load(Ordering::Relaxed) {
                let in_burst = cycle > 0 && sent % cycle < config.burst_len;
                let accel = if in_burst {
                    Vec3::new(
                        rng.random_range(-3.5..3.5),
                        rng.random_range(-3.5..3.5),
                        rng.random_range(-1.0..1.0),
                    )
                } else {
                    Vec3::new(
                        rng.random_range(-0.05..0.05),
                        rng.random_range(-0.05..0.05),
                        rng.random_range(-0.05..0.05),
                    )
                };

                let sample = MotionSample {
                    timestamp_ms: start.elapsed().as_millis() as u64,
                    accel,
                };
                if tx.send(sample).is_err() {
                    break;
                }
                sent += 1;
                thread::sleep(Duration::from_millis(config.interval_ms));
            }
            debug!("synthetic source finished after {sent} samples");
        });

        Ok(Subscription::new(stop, handle))
    }
}

/// One recorded reading: offset from trace start plus raw acceleration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSample {
    pub at_ms: u64,
    pub accel: Vec3,
}

impl TraceSample {
    pub fn new(at_ms: u64, x: f32, y: f32, z: f32) -> Self {
        Self {
            at_ms,
            accel: Vec3::new(x, y, z),
        }
    }
}

/// Replays a recorded trace with its original timing. Sample timestamps
/// are the trace offsets, so replayed sessions are reproducible.
#[derive(Debug)]
pub struct ReplaySource {
    trace: Vec<TraceSample>,
    subscribed: bool,
}

impl ReplaySource {
    pub fn new(trace: Vec<TraceSample>) -> Self {
        Self {
            trace,
            subscribed: false,
        }
    }
}

impl SampleSource for ReplaySource {
    fn subscribe(&mut self, tx: Sender<MotionSample>) -> Result<Subscription> {
        if self.subscribed {
            return Err(SensorError::AlreadySubscribed);
        }
        if self.trace.is_empty() {
            return Err(SensorError::EmptyTrace);
        }
        self.subscribed = true;

        let trace = std::mem::take(&mut self.trace);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let start = Instant::now();
            for entry in trace {
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }
                let elapsed = start.elapsed().as_millis() as u64;
                if entry.at_ms > elapsed {
                    thread::sleep(Duration::from_millis(entry.at_ms - elapsed));
                }
                let sample = MotionSample {
                    timestamp_ms: entry.at_ms,
                    accel: entry.accel,
                };
                if tx.send(sample).is_err() {
                    break;
                }
            }
            debug!("replay source finished");
        });

        Ok(Subscription::new(stop, handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_synthetic_delivers_samples() {
        let mut source = SyntheticAccelerometer::new(SyntheticConfig {
            seed: 1,
            interval_ms: 1,
            burst_len: 4,
            quiet_len: 4,
            total: 20,
        });
        let (tx, rx) = mpsc::channel();
        let sub = source.subscribe(tx).unwrap();

        let mut got = 0;
        while let Ok(sample) = rx.recv_timeout(Duration::from_secs(2)) {
            assert!(sample.accel.x.abs() <= 3.5);
            got += 1;
        }
        assert_eq!(got, 20);
        drop(sub);
    }

    #[test]
    fn test_synthetic_same_seed_same_readings() {
        let config = SyntheticConfig {
            seed: 42,
            interval_ms: 0,
            burst_len: 4,
            quiet_len: 0,
            total: 10,
        };
        let collect = |config: SyntheticConfig| {
            let mut source = SyntheticAccelerometer::new(config);
            let (tx, rx) = mpsc::channel();
            let _sub = source.subscribe(tx).unwrap();
            rx.iter().map(|s| s.accel).collect::<Vec<_>>()
        };

        assert_eq!(collect(config.clone()), collect(config));
    }

    #[test]
    fn test_double_subscribe_fails() {
        let mut source = SyntheticAccelerometer::with_defaults();
        let (tx, _rx) = mpsc::channel();
        let sub = source.subscribe(tx).unwrap();
        sub.stop();

        let (tx2, _rx2) = mpsc::channel();
        assert_eq!(
            source.subscribe(tx2).err(),
            Some(SensorError::AlreadySubscribed)
        );
    }

    #[test]
    fn test_stop_halts_producer_early() {
        let mut source = SyntheticAccelerometer::new(SyntheticConfig {
            interval_ms: 5,
            total: 10_000,
            ..SyntheticConfig::default()
        });
        let (tx, rx) = mpsc::channel();
        let sub = source.subscribe(tx).unwrap();

        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        sub.stop();
        // Draining to disconnect proves the producer exited well short of
        // its configured total
        let leftover = rx.iter().count();
        assert!(leftover < 1000);
        drop(sub);
    }

    #[test]
    fn test_replay_preserves_trace() {
        let trace = vec![
            TraceSample::new(0, 2.0, 0.0, 0.0),
            TraceSample::new(5, 0.0, 1.0, 0.0),
            TraceSample::new(10, -3.0, 0.0, 0.5),
        ];
        let mut source = ReplaySource::new(trace.clone());
        let (tx, rx) = mpsc::channel();
        let _sub = source.subscribe(tx).unwrap();

        let got: Vec<MotionSample> = rx.iter().collect();
        assert_eq!(got.len(), 3);
        for (sample, entry) in got.iter().zip(&trace) {
            assert_eq!(sample.timestamp_ms, entry.at_ms);
            assert_eq!(sample.accel, entry.accel);
        }
    }

    #[test]
    fn test_empty_trace_is_an_error() {
        let mut source = ReplaySource::new(Vec::new());
        let (tx, _rx) = mpsc::channel();
        assert_eq!(source.subscribe(tx).err(), Some(SensorError::EmptyTrace));
    }
}
