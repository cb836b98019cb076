//! Angular integrator
//!
//! A single rotational degree of freedom under speed-dependent exponential
//! damping. The damping exponent is scaled by `dt * reference_rate`, so the
//! effective decay per second does not depend on the caller's frame rate.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;
use crate::wrap_angle;

/// Mutable spin state. Owned and mutated exclusively by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinPhysics {
    /// Current rotation, normalized to [0, 2π)
    pub angle: f32,
    /// Signed angular velocity (rad/s)
    pub velocity: f32,
    /// Tooth that last registered a collision, cleared when the cooldown expires
    pub last_tooth_hit: Option<usize>,
    /// Seconds remaining before another tooth collision may register
    pub tooth_cooldown: f32,
}

impl Default for SpinPhysics {
    fn default() -> Self {
        Self {
            angle: 0.0,
            velocity: 0.0,
            last_tooth_hit: None,
            tooth_cooldown: 0.0,
        }
    }
}

impl SpinPhysics {
    /// Add an angular impulse, saturating at the configured speed bound.
    /// Saturation is silent and documented behavior, not a failure.
    pub fn add_impulse(&mut self, delta: f32, max_speed: f32) {
        self.velocity = (self.velocity + delta).clamp(-max_speed, max_speed);
    }

    /// Advance by `dt` seconds. The caller guarantees 0 < dt and finite.
    pub fn step(&mut self, dt: f32, tuning: &Tuning) {
        self.angle = wrap_angle(self.angle + self.velocity * dt);

        let friction = tuning.friction_for(self.velocity.abs());
        self.velocity *= friction.powf(dt * tuning.reference_rate);

        self.tooth_cooldown = (self.tooth_cooldown - dt).max(0.0);

        // Exponential decay never reaches zero on its own; the snap below
        // is the authoritative stop condition.
        if self.velocity.abs() < tuning.min_speed {
            self.velocity = 0.0;
        }
    }

    /// Reset velocity and collision guards for a fresh spin. The angle is
    /// intentionally preserved so a zero-strength spin reports whatever
    /// sector already sits under the pointer.
    pub fn reset_for_spin(&mut self) {
        self.velocity = 0.0;
        self.last_tooth_hit = None;
        self.tooth_cooldown = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_angle_stays_normalized() {
        let tuning = Tuning::default();
        let mut phys = SpinPhysics::default();
        phys.add_impulse(45.0, tuning.max_speed);
        for _ in 0..2000 {
            phys.step(0.016, &tuning);
            assert!(phys.angle >= 0.0 && phys.angle < TAU, "angle = {}", phys.angle);
        }
    }

    #[test]
    fn test_impulse_saturates_both_directions() {
        let tuning = Tuning::default();
        let mut phys = SpinPhysics::default();
        phys.add_impulse(1000.0, tuning.max_speed);
        assert_eq!(phys.velocity, tuning.max_speed);
        phys.add_impulse(-5000.0, tuning.max_speed);
        assert_eq!(phys.velocity, -tuning.max_speed);
    }

    #[test]
    fn test_snap_to_zero_below_min_speed() {
        let tuning = Tuning::default();
        let mut phys = SpinPhysics {
            velocity: tuning.min_speed * 0.5,
            ..Default::default()
        };
        phys.step(0.016, &tuning);
        assert_eq!(phys.velocity, 0.0);
    }

    #[test]
    fn test_decay_is_frame_rate_independent() {
        let tuning = Tuning::default();
        let mut coarse = SpinPhysics { velocity: 30.0, ..Default::default() };
        let mut fine = SpinPhysics { velocity: 30.0, ..Default::default() };

        for _ in 0..60 {
            coarse.step(0.016, &tuning);
        }
        for _ in 0..120 {
            fine.step(0.008, &tuning);
        }

        // Same simulated second, same decay to within band-boundary noise
        let rel = (coarse.velocity - fine.velocity).abs() / coarse.velocity.abs();
        assert!(rel < 0.02, "coarse {} vs fine {}", coarse.velocity, fine.velocity);
    }

    #[test]
    fn test_cooldown_floors_at_zero() {
        let tuning = Tuning::default();
        let mut phys = SpinPhysics {
            tooth_cooldown: 0.02,
            ..Default::default()
        };
        phys.step(0.016, &tuning);
        phys.step(0.016, &tuning);
        assert_eq!(phys.tooth_cooldown, 0.0);
    }

    #[test]
    fn test_eventually_stops_from_max_speed() {
        let tuning = Tuning::default();
        let mut phys = SpinPhysics::default();
        phys.add_impulse(tuning.max_speed, tuning.max_speed);
        let mut ticks = 0u32;
        while phys.velocity != 0.0 {
            phys.step(0.016, &tuning);
            ticks += 1;
            assert!(ticks < 10_000, "integrator failed to stop");
        }
    }

    #[test]
    fn test_reset_preserves_angle() {
        let tuning = Tuning::default();
        let mut phys = SpinPhysics::default();
        phys.add_impulse(10.0, tuning.max_speed);
        phys.step(0.016, &tuning);
        let angle = phys.angle;
        phys.reset_for_spin();
        assert_eq!(phys.angle, angle);
        assert_eq!(phys.velocity, 0.0);
        assert_eq!(phys.last_tooth_hit, None);
    }
}
