//! Data-driven spin balance
//!
//! Every constant that shapes how a spin feels lives here: friction bands,
//! impulse ranges, the tooth reaction table and the chaos generator ranges.
//! The stochastic low-speed branch probabilities are tuning, not physics -
//! tweak them in data, not in the engine.

use serde::{Deserialize, Serialize};

/// A half-open random range `min + U * span`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MagnitudeRange {
    pub min: f32,
    pub span: f32,
}

impl MagnitudeRange {
    pub const fn new(min: f32, span: f32) -> Self {
        Self { min, span }
    }

    /// Sample with a uniform draw in [0, 1)
    #[inline]
    pub fn sample(&self, u: f32) -> f32 {
        self.min + u * self.span
    }
}

/// Proportional damping applied on a tooth hit: `v *= 1 - (base + U*jitter) * mult`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DampBand {
    pub base: f32,
    pub jitter: f32,
    /// Normalized hit intensity reported to the hit callback
    pub intensity: f32,
}

/// Low-speed reaction with stochastic branching: mostly damp, sometimes a
/// forward push past the tooth, sometimes a partial bounce off it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DramaBand {
    pub push_chance: f32,
    pub push: MagnitudeRange,
    pub push_intensity: f32,
    pub bounce_chance: f32,
    /// Fraction of speed retained by the reversal
    pub bounce: MagnitudeRange,
    pub bounce_intensity: f32,
    pub damp: DampBand,
}

/// Velocity-banded tooth reaction table
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReactionTable {
    pub fast_over: f32,
    pub fast: DampBand,
    pub medium_over: f32,
    pub medium: DampBand,
    pub slow_over: f32,
    pub slow: DampBand,
    pub crawl_over: f32,
    pub crawl: DampBand,
    pub drama_over: f32,
    pub drama: DramaBand,
    pub critical: DramaBand,
}

/// Chaos schedule generation ranges
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChaosTuning {
    /// Normal-spin window before the first event may fire
    pub warmup_ms: f32,
    /// Width of the window events are scattered across, after warm-up
    pub window_ms: f32,
    /// Guaranteed events of each non-pause kind
    pub guaranteed_per_kind: usize,
    /// Extra events of random kind on top of the guaranteed pool
    pub extra_min: usize,
    pub extra_span: usize,
    /// Chance that a spin gets any pause events at all
    pub pause_chance: f32,
    pub pause_duration_ms: MagnitudeRange,
    pub boost: MagnitudeRange,
    pub brake: MagnitudeRange,
    pub reverse: MagnitudeRange,
    pub mega_boost: MagnitudeRange,
    pub double_reverse: MagnitudeRange,
    pub hurricane: MagnitudeRange,
    /// Delay before the second half of a double reverse
    pub double_reverse_delay_ms: f32,
    /// Speed retained by the second negation
    pub double_reverse_retention: f32,
}

/// Complete spin balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Angular speed clamp for impulses (rad/s)
    pub max_speed: f32,
    /// Below this |velocity| snaps to exactly 0 - the stop condition
    pub min_speed: f32,
    /// Friction exponent reference rate: decay factors are per-tick at
    /// this rate, `step` raises them to `dt * reference_rate`
    pub reference_rate: f32,
    /// Friction factors by speed band, fastest band first
    pub friction_extreme: f32,
    pub friction_high: f32,
    pub friction_mid: f32,
    pub friction_low: f32,
    pub friction_crawl: f32,
    /// Sector count the impulse ranges were tuned at
    pub reference_sectors: f32,
    pub normal_impulse: MagnitudeRange,
    pub chaos_impulse: MagnitudeRange,
    /// Seconds before another tooth collision may register
    pub tooth_cooldown: f32,
    pub reaction: ReactionTable,
    pub chaos: ChaosTuning,
    /// Label shuffles per chaos spin (normal spins shuffle once)
    pub chaos_shuffles: MagnitudeRange,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_speed: 60.0,
            min_speed: 0.01,
            reference_rate: 60.0,
            friction_extreme: 0.996,
            friction_high: 0.995,
            friction_mid: 0.993,
            friction_low: 0.988,
            friction_crawl: 0.975,
            reference_sectors: 8.0,
            normal_impulse: MagnitudeRange::new(22.0, 15.0),
            chaos_impulse: MagnitudeRange::new(15.0, 30.0),
            tooth_cooldown: 0.08,
            reaction: ReactionTable {
                fast_over: 8.0,
                fast: DampBand { base: 0.04, jitter: 0.02, intensity: 0.9 },
                medium_over: 4.0,
                medium: DampBand { base: 0.08, jitter: 0.04, intensity: 0.7 },
                slow_over: 2.0,
                slow: DampBand { base: 0.12, jitter: 0.05, intensity: 0.5 },
                crawl_over: 0.8,
                crawl: DampBand { base: 0.18, jitter: 0.08, intensity: 0.3 },
                drama_over: 0.3,
                drama: DramaBand {
                    push_chance: 0.15,
                    push: MagnitudeRange::new(0.2, 0.15),
                    push_intensity: 0.25,
                    bounce_chance: 0.15,
                    bounce: MagnitudeRange::new(0.25, 0.2),
                    bounce_intensity: 0.2,
                    damp: DampBand { base: 0.25, jitter: 0.12, intensity: 0.2 },
                },
                critical: DramaBand {
                    push_chance: 0.10,
                    push: MagnitudeRange::new(0.3, 0.2),
                    push_intensity: 0.15,
                    bounce_chance: 0.15,
                    bounce: MagnitudeRange::new(0.15, 0.1),
                    bounce_intensity: 0.1,
                    damp: DampBand { base: 0.35, jitter: 0.15, intensity: 0.1 },
                },
            },
            chaos: ChaosTuning {
                warmup_ms: 2500.0,
                window_ms: 4000.0,
                guaranteed_per_kind: 5,
                extra_min: 20,
                extra_span: 20,
                pause_chance: 0.05,
                pause_duration_ms: MagnitudeRange::new(50.0, 300.0),
                boost: MagnitudeRange::new(3.0, 7.0),
                brake: MagnitudeRange::new(0.3, 0.4),
                reverse: MagnitudeRange::new(0.6, 0.3),
                mega_boost: MagnitudeRange::new(15.0, 25.0),
                double_reverse: MagnitudeRange::new(0.7, 0.2),
                hurricane: MagnitudeRange::new(20.0, 30.0),
                double_reverse_delay_ms: 150.0,
                double_reverse_retention: 0.8,
            },
            chaos_shuffles: MagnitudeRange::new(2.0, 4.0),
        }
    }
}

impl Tuning {
    /// Per-tick friction factor for the current speed. Fast wheels coast
    /// (weak proportional damping), slow wheels grind to a stop.
    pub fn friction_for(&self, speed: f32) -> f32 {
        if speed > 20.0 {
            self.friction_extreme
        } else if speed > 15.0 {
            self.friction_high
        } else if speed > 8.0 {
            self.friction_mid
        } else if speed > 3.0 {
            self.friction_low
        } else {
            self.friction_crawl
        }
    }

    /// Impulse scale so wheels with more sectors get proportionally more
    /// rotational energy (more teeth to grind through before stopping)
    pub fn sector_multiplier(&self, count: usize) -> f32 {
        (count as f32 / self.reference_sectors).sqrt()
    }

    /// Per-hit damping scale: fewer, wider sectors damp harder since each
    /// hit represents a larger fraction of a full rotation
    pub fn damping_multiplier(&self, count: usize) -> f32 {
        match count {
            0..=2 => 2.5,
            3 => 2.0,
            4..=5 => 1.5,
            _ => 1.0,
        }
    }

    /// Load tuning overrides from a JSON document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
