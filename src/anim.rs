//! Dot presentation animation
//!
//! A small spring-damper that eases the drawn dot toward the controller's
//! target, with a visible bounce on arrival. Presentation only: hit tests
//! read the clamped target, never these interpolated frames, so retuning
//! the spring cannot change feedback behavior.

use glam::Vec2;

use crate::consts::{SPRING_DAMPING, SPRING_STIFFNESS};

/// Underdamped spring driving the drawn dot position
#[derive(Debug, Clone, Copy)]
pub struct DotSpring {
    pub pos: Vec2,
    pub vel: Vec2,
    target: Vec2,
    stiffness: f32,
    damping: f32,
}

impl DotSpring {
    pub fn new(start: Vec2) -> Self {
        Self {
            pos: start,
            vel: Vec2::ZERO,
            target: start,
            stiffness: SPRING_STIFFNESS,
            damping: SPRING_DAMPING,
        }
    }

    /// Retarget mid-flight; position and velocity carry over, no queuing
    pub fn set_target(&mut self, target: Vec2) {
        self.target = target;
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Advance the spring by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        let diff = self.target - self.pos;
        let spring_force = diff * self.stiffness;
        let damping_force = self.vel * self.damping;
        let acceleration = spring_force - damping_force;
        self.vel += acceleration * dt;
        self.pos += self.vel * dt;
    }

    /// Whether the dot has effectively come to rest on the target
    pub fn settled(&self) -> bool {
        (self.target - self.pos).length() < 0.5 && self.vel.length() < 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_starts_at_rest() {
        let mut spring = DotSpring::new(Vec2::new(10.0, 20.0));
        assert!(spring.settled());
        spring.step(DT);
        assert_eq!(spring.pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_converges_to_target() {
        let mut spring = DotSpring::new(Vec2::ZERO);
        spring.set_target(Vec2::new(100.0, 40.0));

        for _ in 0..600 {
            spring.step(DT);
        }
        assert!(spring.settled());
        assert!((spring.pos - Vec2::new(100.0, 40.0)).length() < 0.5);
    }

    #[test]
    fn test_overshoots_then_returns() {
        // The tuning is underdamped, so the dot should visibly pass the
        // target before coming back
        let mut spring = DotSpring::new(Vec2::ZERO);
        spring.set_target(Vec2::new(100.0, 0.0));

        let mut max_x = 0.0_f32;
        for _ in 0..600 {
            spring.step(DT);
            max_x = max_x.max(spring.pos.x);
        }
        assert!(max_x > 105.0, "expected overshoot, peaked at {max_x}");
        assert!((spring.pos.x - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_retarget_mid_flight() {
        let mut spring = DotSpring::new(Vec2::ZERO);
        spring.set_target(Vec2::new(100.0, 0.0));
        for _ in 0..30 {
            spring.step(DT);
        }
        let mid = spring.pos;

        // Retargeting moves the goal, not the dot
        spring.set_target(Vec2::new(-50.0, 0.0));
        assert_eq!(spring.pos, mid);

        for _ in 0..900 {
            spring.step(DT);
        }
        assert!((spring.pos.x - (-50.0)).abs() < 0.5);
    }
}
