//! Shake Dot entry point
//!
//! Headless demo: a seeded synthetic accelerometer shakes the dot around,
//! every band hit and settle prints as one JSON line, and the session
//! summary closes the run. Pass a JSON config path as the only argument to
//! override the default tuning.

use std::path::Path;
use std::process::ExitCode;

use shake_dot::config::MotionConfig;
use shake_dot::display::LogCanvas;
use shake_dot::feedback::{LogHaptics, LogSound};
use shake_dot::sensor::SyntheticAccelerometer;
use shake_dot::session::MotionSession;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Shake Dot starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => MotionConfig::load_or_default(Path::new(&path)),
        None => MotionConfig::default(),
    };

    let mut source = SyntheticAccelerometer::with_defaults();
    let mut session = MotionSession::new(config, LogHaptics, LogSound, LogCanvas);

    let summary = match session.run(&mut source, |event| {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
    }) {
        Ok(summary) => summary,
        Err(err) => {
            log::error!("session failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Ok(line) = serde_json::to_string(&summary) {
        println!("{line}");
    }
    log::info!(
        "done in {}ms ({:.0}% of samples qualified)",
        summary.duration_ms,
        summary.qualify_ratio() * 100.0
    );
    ExitCode::SUCCESS
}
