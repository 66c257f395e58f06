//! Screen and band geometry
//!
//! Two full-width target bands stacked against the screen midline: the top
//! band ends where the bottom band begins. The dot and the bands are all
//! top-left anchored, so a dot of size `d` is wholly inside a band when its
//! anchor y lies in `[band.y, band.y + band.height - d]`.

use glam::Vec2;
use log::warn;
use serde::{Deserialize, Serialize};

/// Which of the two target bands a position falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    Top,
    Bottom,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Top => "top",
            Band::Bottom => "bottom",
        }
    }
}

/// Axis-aligned band rectangle (top-left anchored)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BandRect {
    /// Lowest anchor y at which a dot is wholly inside this band
    #[inline]
    pub fn dot_min_y(&self) -> f32 {
        self.y
    }

    /// Highest anchor y at which a dot is wholly inside this band
    #[inline]
    pub fn dot_max_y(&self, dot_size: f32) -> f32 {
        self.y + self.height - dot_size
    }

    /// Whether a dot anchored at `y` is wholly inside this band (inclusive ends)
    #[inline]
    pub fn contains_dot(&self, y: f32, dot_size: f32) -> bool {
        y >= self.dot_min_y() && y <= self.dot_max_y(dot_size)
    }

    /// Clamp a dot anchor y into this band's extent. A dot taller than the
    /// band pins at the band top.
    #[inline]
    pub fn clamp_dot(&self, y: f32, dot_size: f32) -> f32 {
        y.clamp(
            self.dot_min_y(),
            self.dot_max_y(dot_size).max(self.dot_min_y()),
        )
    }
}

/// Static screen geometry, computed once at startup from the screen size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenLayout {
    pub width: f32,
    pub height: f32,
    pub dot_size: f32,
    pub top: BandRect,
    pub bottom: BandRect,
}

impl ScreenLayout {
    /// Build the layout: bands are full-width, `band_height_frac` of the
    /// screen tall, meeting at the vertical midline. A requested band height
    /// shorter than the dot is raised to the dot size, keeping the per-band
    /// clamp and hit ranges ordered.
    pub fn new(width: f32, height: f32, dot_size: f32, band_height_frac: f32) -> Self {
        let requested = height * band_height_frac;
        let band_height = if requested < dot_size {
            warn!("band height {requested:.1} shorter than the dot, using {dot_size:.1}");
            dot_size
        } else {
            requested
        };
        let top = BandRect {
            x: 0.0,
            y: height / 2.0 - band_height,
            width,
            height: band_height,
        };
        let bottom = BandRect {
            x: 0.0,
            y: height / 2.0,
            width,
            height: band_height,
        };
        Self {
            width,
            height,
            dot_size,
            top,
            bottom,
        }
    }

    pub fn band(&self, band: Band) -> &BandRect {
        match band {
            Band::Top => &self.top,
            Band::Bottom => &self.bottom,
        }
    }

    /// Band whose half of the screen contains the given anchor y (midline test)
    #[inline]
    pub fn occupied_band(&self, y: f32) -> Band {
        if y < self.height / 2.0 {
            Band::Top
        } else {
            Band::Bottom
        }
    }

    /// Clamp a dot anchor x into the visible screen. A dot wider than the
    /// screen pins at zero.
    #[inline]
    pub fn clamp_x(&self, x: f32) -> f32 {
        x.clamp(0.0, (self.width - self.dot_size).max(0.0))
    }

    /// Clamp a candidate position: x to the screen, y into whichever band
    /// the dot currently occupies per `current_y`.
    pub fn clamp_candidate(&self, current_y: f32, candidate: Vec2) -> Vec2 {
        let band = self.band(self.occupied_band(current_y));
        Vec2::new(
            self.clamp_x(candidate.x),
            band.clamp_dot(candidate.y, self.dot_size),
        )
    }

    /// Hit test: which band wholly contains a dot anchored at `y`, if any
    pub fn hit_band(&self, y: f32) -> Option<Band> {
        if self.top.contains_dot(y, self.dot_size) {
            Some(Band::Top)
        } else if self.bottom.contains_dot(y, self.dot_size) {
            Some(Band::Bottom)
        } else {
            None
        }
    }

    /// Resting position: dot centered on the screen, x kept on-screen
    pub fn rest_position(&self) -> Vec2 {
        Vec2::new(
            self.clamp_x(self.width / 2.0 - self.dot_size / 2.0),
            self.height / 2.0 - self.dot_size / 2.0,
        )
    }
}
