//! Hell Wheel - spin physics for a wheel-of-fortune widget
//!
//! Core modules:
//! - `sim`: Deterministic simulation (integrator, sectors, chaos, engine)
//! - `tuning`: Data-driven spin balance
//!
//! Rendering, audio and UI live in the embedding application; they drive
//! the engine through `WheelEngine::step` and observe it through state
//! accessors and callbacks.

pub mod sim;
pub mod tuning;

pub use sim::{SpinOutcome, SpinPhysics, WheelEngine, WheelPhase};
pub use tuning::Tuning;

/// Engine configuration constants
pub mod consts {
    /// Fixed angle of the result pointer (top of the wheel)
    pub const POINTER_ANGLE: f32 = std::f32::consts::FRAC_PI_2;

    /// Hard cap on sector count accepted by `set_labels`
    pub const MAX_SECTORS: usize = 24;

    /// Largest per-tick timestep callers should pass to `step`
    /// (animation drivers clamp to this on tab-resume)
    pub const MAX_STEP_DT: f32 = 0.033;

    /// Default timestep for headless drivers (60 Hz)
    pub const DEFAULT_DT: f32 = 1.0 / 60.0;
}

/// Normalize an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::TAU;
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid of a tiny negative can round back up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Signed shortest angular difference a - b, in (-π, π]
#[inline]
pub fn angular_difference(a: f32, b: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let diff = wrap_angle(a - b);
    if diff > PI { diff - TAU } else { diff }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn test_wrap_angle_range() {
        for raw in [-100.0_f32, -TAU, -0.1, 0.0, 0.1, PI, TAU, 17.5, 1e-10, -1e-10] {
            let w = wrap_angle(raw);
            assert!((0.0..TAU).contains(&w), "wrap_angle({raw}) = {w}");
        }
    }

    #[test]
    fn test_wrap_angle_identity_in_range() {
        assert!((wrap_angle(1.0) - 1.0).abs() < 1e-6);
        assert!((wrap_angle(1.0 + TAU) - 1.0).abs() < 1e-5);
        assert!((wrap_angle(1.0 - TAU) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_angular_difference_shortest_path() {
        assert!((angular_difference(0.1, TAU - 0.1) - 0.2).abs() < 1e-5);
        assert!((angular_difference(TAU - 0.1, 0.1) + 0.2).abs() < 1e-5);
        assert!((angular_difference(FRAC_PI_2, 0.0) - FRAC_PI_2).abs() < 1e-6);
    }
}
