//! One interactive session: sensor in, feedback and drawing out
//!
//! The session owns the controller, the spring, the feedback sinks, and the
//! canvas, and drives all of them from a single thread. Samples arrive over
//! a channel; the receive timeout is bounded by the settle deadline and the
//! frame cadence, so timer checks and animation never need a second thread.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::info;
use serde::Serialize;

use crate::anim::DotSpring;
use crate::config::MotionConfig;
use crate::consts::FRAME_INTERVAL_MS;
use crate::display::DotCanvas;
use crate::feedback::{Feedback, Haptics, HitSound};
use crate::sensor::{Result, SampleSource};
use crate::sim::{Band, MotionController, MotionEvent, ShakeOutcome};

/// Counters for one finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub samples: u64,
    pub qualifying_shakes: u64,
    pub top_entries: u64,
    pub bottom_entries: u64,
    pub exits: u64,
    pub settles: u64,
    pub duration_ms: u64,
}

impl SessionSummary {
    /// Fraction of samples that beat the shake gate
    pub fn qualify_ratio(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.qualifying_shakes as f64 / self.samples as f64
        }
    }
}

/// A running motion session over one sample source
pub struct MotionSession<H: Haptics, S: HitSound, C: DotCanvas> {
    controller: MotionController,
    spring: DotSpring,
    feedback: Feedback<H, S>,
    canvas: C,
}

impl<H: Haptics, S: HitSound, C: DotCanvas> MotionSession<H, S, C> {
    pub fn new(config: MotionConfig, haptics: H, sound: S, canvas: C) -> Self {
        let sound_gap_ms = config.sound_gap_ms;
        let controller = MotionController::new(config);
        let spring = DotSpring::new(controller.target());
        Self {
            controller,
            spring,
            feedback: Feedback::new(haptics, sound, sound_gap_ms),
            canvas,
        }
    }

    pub fn controller(&self) -> &MotionController {
        &self.controller
    }

    /// Subscribe to `source` and run until it runs dry, then let any
    /// pending settle and the animation play out. `on_event` sees every
    /// controller event in order.
    pub fn run<Src: SampleSource>(
        &mut self,
        source: &mut Src,
        mut on_event: impl FnMut(&MotionEvent),
    ) -> Result<SessionSummary> {
        let (tx, rx) = mpsc::channel();
        let subscription = source.subscribe(tx)?;

        let start = Instant::now();
        let mut summary = SessionSummary::default();
        let mut last_frame = Instant::now();

        self.canvas.init(&self.controller.layout);
        self.canvas.draw_dot(self.spring.pos);
        info!("session started");

        loop {
            let now_ms = start.elapsed().as_millis() as u64;
            match rx.recv_timeout(self.wait_for(now_ms)) {
                Ok(sample) => {
                    let now_ms = start.elapsed().as_millis() as u64;
                    summary.samples += 1;
                    if let ShakeOutcome::Shake { target, event, .. } =
                        self.controller.handle_sample(sample, now_ms)
                    {
                        summary.qualifying_shakes += 1;
                        self.spring.set_target(target);
                        if let Some(event) = event {
                            match event {
                                MotionEvent::BandEntered {
                                    band: Band::Top, ..
                                } => summary.top_entries += 1,
                                MotionEvent::BandEntered {
                                    band: Band::Bottom, ..
                                } => summary.bottom_entries += 1,
                                MotionEvent::BandExited { .. } => summary.exits += 1,
                                MotionEvent::Settled { .. } => {}
                            }
                            self.feedback.apply(&event, now_ms);
                            on_event(&event);
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            self.tick(start, &mut last_frame, &mut summary, &mut on_event);
        }

        // Source is dry; finish the pending settle and let the dot glide
        // home before reporting. The cap covers the longest pending settle
        // deadline plus a glide allowance, in case the spring never rests.
        for _ in 0..self.drain_frames() {
            if self.controller.settle_deadline().is_none() && self.spring.settled() {
                break;
            }
            thread::sleep(Duration::from_millis(FRAME_INTERVAL_MS));
            self.tick(start, &mut last_frame, &mut summary, &mut on_event);
        }
        drop(subscription);

        summary.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "session finished: {} samples, {} shakes, {} hits, {} settles",
            summary.samples,
            summary.qualifying_shakes,
            summary.top_entries + summary.bottom_entries,
            summary.settles
        );
        Ok(summary)
    }

    /// One housekeeping pass: settle poll, then an animation step
    fn tick(
        &mut self,
        start: Instant,
        last_frame: &mut Instant,
        summary: &mut SessionSummary,
        on_event: &mut impl FnMut(&MotionEvent),
    ) {
        let now_ms = start.elapsed().as_millis() as u64;
        if let Some(event) = self.controller.poll_settle(now_ms) {
            if let MotionEvent::Settled { resting } = event {
                self.spring.set_target(resting);
            }
            summary.settles += 1;
            self.feedback.apply(&event, now_ms);
            on_event(&event);
        }

        // Clamped dt: a long quiet wait must not kick the integrator
        let dt = last_frame.elapsed().as_secs_f32().min(0.05);
        *last_frame = Instant::now();
        if !self.spring.settled() {
            self.spring.step(dt);
            self.canvas.draw_dot(self.spring.pos);
        }
    }

    /// How long the loop may sleep: until the settle deadline if one is
    /// armed, never longer than a frame
    fn wait_for(&self, now_ms: u64) -> Duration {
        let frame = Duration::from_millis(FRAME_INTERVAL_MS);
        match self.controller.settle_deadline() {
            Some(deadline) if deadline > now_ms => {
                frame.min(Duration::from_millis(deadline - now_ms))
            }
            Some(_) => Duration::ZERO,
            None => frame,
        }
    }

    /// Frames the post-source drain may run: enough to reach the longest
    /// pending settle deadline, plus a glide allowance for the spring
    fn drain_frames(&self) -> u64 {
        self.controller.config.settle_after_ms / FRAME_INTERVAL_MS + 600
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::LogCanvas;
    use crate::sensor::{ReplaySource, SensorError, TraceSample};
    use crate::sim::ImpactTier;

    #[derive(Debug, Default)]
    struct RecordingHaptics {
        impacts: Vec<ImpactTier>,
        cancels: usize,
    }

    impl Haptics for RecordingHaptics {
        fn impact(&mut self, tier: ImpactTier) {
            self.impacts.push(tier);
        }

        fn vibrate(&mut self, _pattern: &[u64]) {}

        fn cancel_vibration(&mut self) {
            self.cancels += 1;
        }
    }

    #[derive(Debug, Default)]
    struct CountingSound {
        plays: usize,
    }

    impl HitSound for CountingSound {
        fn play(&mut self) {
            self.plays += 1;
        }
    }

    fn quick_config() -> MotionConfig {
        MotionConfig {
            settle_after_ms: 100,
            ..MotionConfig::default()
        }
    }

    #[test]
    fn test_replay_session_enters_then_settles() {
        let mut session = MotionSession::new(
            quick_config(),
            RecordingHaptics::default(),
            CountingSound::default(),
            LogCanvas,
        );
        // One hard shake, one counter-shake that stays in the same band
        let mut source = ReplaySource::new(vec![
            TraceSample::new(0, 2.0, 0.0, 0.0),
            TraceSample::new(30, -2.0, 0.0, 0.0),
        ]);

        let mut events = Vec::new();
        let summary = session
            .run(&mut source, |event| events.push(*event))
            .unwrap();

        assert_eq!(summary.samples, 2);
        assert_eq!(summary.qualifying_shakes, 2);
        assert_eq!(summary.top_entries, 1);
        assert_eq!(summary.bottom_entries, 0);
        assert_eq!(summary.exits, 0);
        assert_eq!(summary.settles, 1);

        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            MotionEvent::BandEntered {
                band: Band::Top,
                tier: ImpactTier::Medium,
                ..
            }
        ));
        assert!(matches!(events[1], MotionEvent::Settled { .. }));

        // Entry fired feedback once; the second shake stayed latched
        assert_eq!(session.feedback.haptics.impacts, vec![ImpactTier::Medium]);
        assert_eq!(session.feedback.sound.plays, 1);
        // Settling never cancels vibration
        assert_eq!(session.feedback.haptics.cancels, 0);

        // After the drain the dot is back at rest
        let rest = session.controller().layout.rest_position();
        assert_eq!(session.controller().target(), rest);
        assert!((session.spring.pos - rest).length() < 1.0);
    }

    #[test]
    fn test_below_threshold_trace_is_inert() {
        let mut session = MotionSession::new(
            quick_config(),
            RecordingHaptics::default(),
            CountingSound::default(),
            LogCanvas,
        );
        let mut source = ReplaySource::new(vec![
            TraceSample::new(0, 0.3, 0.2, 0.0),
            TraceSample::new(20, -0.4, 0.1, 0.0),
            TraceSample::new(40, 0.2, -0.3, 0.0),
        ]);

        let mut events = Vec::new();
        let summary = session
            .run(&mut source, |event| events.push(*event))
            .unwrap();

        assert_eq!(summary.samples, 3);
        assert_eq!(summary.qualifying_shakes, 0);
        assert_eq!(summary.settles, 0);
        assert!(events.is_empty());
        assert_eq!(summary.qualify_ratio(), 0.0);
        assert_eq!(session.feedback.sound.plays, 0);
    }

    #[test]
    fn test_empty_source_errors_out() {
        let mut session = MotionSession::new(
            quick_config(),
            RecordingHaptics::default(),
            CountingSound::default(),
            LogCanvas,
        );
        let mut source = ReplaySource::new(Vec::new());

        let err = session.run(&mut source, |_| {}).unwrap_err();
        assert_eq!(err, SensorError::EmptyTrace);
    }

    #[test]
    fn test_drain_budget_scales_with_settle_window() {
        let session = MotionSession::new(
            MotionConfig {
                settle_after_ms: 12_000,
                ..MotionConfig::default()
            },
            RecordingHaptics::default(),
            CountingSound::default(),
            LogCanvas,
        );
        // The drain outlives any pending deadline, however long the
        // configured window, and keeps the glide allowance on top
        assert!(session.drain_frames() * FRAME_INTERVAL_MS >= 12_000);
        assert!(session.drain_frames() >= 600);
    }
}
