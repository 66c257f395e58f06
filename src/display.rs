//! Presentation surface
//!
//! The motion core never draws. Whatever owns the screen implements
//! `DotCanvas`: it is told the static geometry once and the drawn dot
//! position every time the animation moves. The shipped implementation
//! just logs, for headless runs.

use glam::Vec2;
use log::{debug, info};

use crate::sim::ScreenLayout;

/// Where the bands and the dot get painted
pub trait DotCanvas {
    /// Called once at session start with the static geometry
    fn init(&mut self, layout: &ScreenLayout);
    /// Called whenever the drawn dot position changes
    fn draw_dot(&mut self, pos: Vec2);
}

/// Headless canvas: geometry at info level, dot movement at debug level
#[derive(Debug, Default)]
pub struct LogCanvas;

impl DotCanvas for LogCanvas {
    fn init(&mut self, layout: &ScreenLayout) {
        info!(
            "canvas {}x{}, top band y {:.1}..{:.1}, bottom band y {:.1}..{:.1}",
            layout.width,
            layout.height,
            layout.top.y,
            layout.top.y + layout.top.height,
            layout.bottom.y,
            layout.bottom.y + layout.bottom.height,
        );
    }

    fn draw_dot(&mut self, pos: Vec2) {
        debug!("dot at ({:.1}, {:.1})", pos.x, pos.y);
    }
}
