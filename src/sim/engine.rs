//! Wheel engine: collision resolution, outcome mapping, chaos scheduling
//!
//! Drives the angular integrator once per external tick and owns the spin
//! state machine (Idle -> Spinning -> Stopped). Within one tick the order
//! is fixed: chaos events, then integration, then tooth collision, then
//! the stop check. The engine never panics across its public boundary;
//! invalid invocations degrade to no-ops so an animation loop stays
//! renderable.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chaos::{ChaosEvent, ChaosKind, ChaosSchedule};
use super::physics::SpinPhysics;
use super::sectors::SectorSet;
use crate::consts::POINTER_ANGLE;
use crate::tuning::{DampBand, DramaBand, Tuning};
use crate::{angular_difference, wrap_angle};

/// Spin state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelPhase {
    /// No spin has run yet
    Idle,
    /// A spin is in flight
    Spinning,
    /// The last spin settled and emitted its outcome
    Stopped,
}

/// The sector selected by a completed spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub index: usize,
    pub label: String,
}

type HitHook = Box<dyn FnMut(f32)>;
type ResultHook = Box<dyn FnMut(&str, usize)>;
type PointerHook = Box<dyn FnMut(f32, f32)>;

/// Injected collaborators. All optional; the engine works headless.
#[derive(Default)]
struct Hooks {
    hit: Option<HitHook>,
    result: Option<ResultHook>,
    pointer: Option<PointerHook>,
}

/// Velocity parked by a pause event, restored when the freeze ends
struct PauseState {
    remaining_ms: f32,
    stored_velocity: f32,
}

/// Per-spin chaos bookkeeping, discarded on stop
struct ChaosState {
    schedule: ChaosSchedule,
    elapsed_ms: f32,
    pause: Option<PauseState>,
}

/// The wheel-of-fortune spin engine
pub struct WheelEngine {
    physics: SpinPhysics,
    sectors: SectorSet,
    /// Label change requested mid-spin, applied when the spin stops so
    /// in-flight collision geometry never changes
    pending_labels: Option<SectorSet>,
    phase: WheelPhase,
    chaos: Option<ChaosState>,
    tuning: Tuning,
    rng: Box<dyn RngCore>,
    hooks: Hooks,
    last_outcome: Option<SpinOutcome>,
}

impl WheelEngine {
    /// Engine with the deterministic seeded RNG
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::with_rng(tuning, Pcg32::seed_from_u64(seed))
    }

    /// Engine with an injected uniform random source
    pub fn with_rng(tuning: Tuning, rng: impl RngCore + 'static) -> Self {
        Self {
            physics: SpinPhysics::default(),
            sectors: SectorSet::empty(),
            pending_labels: None,
            phase: WheelPhase::Idle,
            chaos: None,
            tuning,
            rng: Box::new(rng),
            hooks: Hooks::default(),
            last_outcome: None,
        }
    }

    /// Replace the sector labels. Blank entries are dropped and the list
    /// is capped; the sector set is rebuilt only when content actually
    /// differs. While a spin is in flight the change is queued and applied
    /// after the stop, so count and segment geometry stay fixed.
    pub fn set_labels<S: AsRef<str>>(&mut self, raw: &[S]) {
        let next = SectorSet::from_labels(raw);
        if self.phase == WheelPhase::Spinning {
            if next.labels() != self.sectors.labels() {
                log::debug!("label change queued until the current spin stops");
                self.pending_labels = Some(next);
            } else {
                self.pending_labels = None;
            }
            return;
        }
        if next.labels() != self.sectors.labels() {
            self.sectors = next;
        }
    }

    /// Start a spin. No-op while already spinning, with an empty wheel, or
    /// with a garbage strength. A single-sector wheel spins and reports
    /// its sole label without collision physics, shuffling or chaos.
    pub fn spin(&mut self, strength: f32, chaos_mode: bool) {
        if self.phase == WheelPhase::Spinning {
            log::debug!("spin ignored: already spinning");
            return;
        }
        let count = self.sectors.count();
        if count == 0 {
            log::debug!("spin ignored: no sectors");
            return;
        }
        if !strength.is_finite() || strength < 0.0 {
            log::debug!("spin ignored: invalid strength {strength}");
            return;
        }

        self.physics.reset_for_spin();
        self.last_outcome = None;
        self.chaos = None;

        let chaos_active = chaos_mode && count >= 2;

        if count >= 2 {
            let passes = if chaos_active {
                self.tuning.chaos_shuffles.sample(self.rng.random::<f32>()) as usize
            } else {
                1
            };
            self.sectors.shuffle(&mut *self.rng, passes);
        }

        let range = if chaos_active {
            self.tuning.chaos_impulse
        } else {
            self.tuning.normal_impulse
        };
        let force =
            range.sample(self.rng.random::<f32>()) * strength * self.tuning.sector_multiplier(count);
        let direction = if self.rng.random::<f32>() < 0.5 { 1.0 } else { -1.0 };
        self.physics.add_impulse(force * direction, self.tuning.max_speed);

        if chaos_active {
            let schedule = ChaosSchedule::generate(&mut *self.rng, &self.tuning.chaos);
            log::debug!("chaos spin: {} events scheduled", schedule.len());
            self.chaos = Some(ChaosState {
                schedule,
                elapsed_ms: 0.0,
                pause: None,
            });
        }

        self.phase = WheelPhase::Spinning;
        log::debug!(
            "spin: impulse={:.1}, sectors={count}, chaos={chaos_active}",
            force * direction
        );
    }

    /// Advance the spin by `dt` seconds. Non-finite or non-positive `dt`
    /// is a defensive no-op; ticks outside a spin do nothing.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        if self.phase != WheelPhase::Spinning {
            return;
        }

        if let Some(chaos) = self.chaos.as_mut() {
            chaos.elapsed_ms += dt * 1000.0;

            if let Some(pause) = chaos.pause.as_mut() {
                pause.remaining_ms -= dt * 1000.0;
                if pause.remaining_ms > 0.0 {
                    return;
                }
                self.physics.velocity = pause.stored_velocity;
                chaos.pause = None;
                log::trace!("chaos: pause over, velocity restored");
            }

            while let Some(event) = chaos.schedule.next_due(chaos.elapsed_ms) {
                log::trace!("chaos: {:?} magnitude {:.2}", event.kind, event.magnitude);
                match event.kind {
                    ChaosKind::Boost | ChaosKind::MegaBoost => {
                        let dir = if self.physics.velocity > 0.0 { 1.0 } else { -1.0 };
                        self.physics
                            .add_impulse(dir * event.magnitude, self.tuning.max_speed);
                    }
                    ChaosKind::Hurricane => {
                        let dir = if self.rng.random::<f32>() < 0.5 { 1.0 } else { -1.0 };
                        self.physics
                            .add_impulse(dir * event.magnitude, self.tuning.max_speed);
                    }
                    ChaosKind::Brake => {
                        self.physics.velocity *= event.magnitude;
                    }
                    ChaosKind::Reverse => {
                        self.physics.velocity = -self.physics.velocity * event.magnitude;
                    }
                    ChaosKind::DoubleReverse => {
                        self.physics.velocity = -self.physics.velocity * event.magnitude;
                        chaos.schedule.insert(ChaosEvent {
                            kind: ChaosKind::Reverse,
                            fire_at_ms: chaos.elapsed_ms + self.tuning.chaos.double_reverse_delay_ms,
                            magnitude: self.tuning.chaos.double_reverse_retention,
                            executed: false,
                        });
                    }
                    ChaosKind::Pause => {
                        chaos.pause = Some(PauseState {
                            remaining_ms: event.magnitude,
                            stored_velocity: self.physics.velocity,
                        });
                        self.physics.velocity = 0.0;
                        // Remaining due events fire after the freeze ends
                        break;
                    }
                }
            }

            // A pause freezes integration, collision and the stop check;
            // the parked near-zero velocity must not read as "stopped"
            if chaos.pause.is_some() {
                return;
            }
        }

        let prev_angle = self.physics.angle;
        self.physics.step(dt, &self.tuning);
        let delta = angular_difference(self.physics.angle, prev_angle);

        if self.sectors.count() >= 2
            && self.physics.velocity != 0.0
            && delta != 0.0
            && self.physics.tooth_cooldown <= 0.0
        {
            self.check_tooth_crossing(prev_angle, delta);
        }
        if self.physics.tooth_cooldown <= 0.0 {
            self.physics.last_tooth_hit = None;
        }

        if self.physics.velocity == 0.0 {
            self.finish_spin();
        }
    }

    /// One crossing may register per tick: the first tooth whose world
    /// angle swept across the pointer during this step's rotation.
    fn check_tooth_crossing(&mut self, prev_angle: f32, delta: f32) {
        let forward = delta > 0.0;
        let swept = delta.abs();

        for tooth in 0..self.sectors.count() {
            if self.physics.last_tooth_hit == Some(tooth) {
                continue;
            }
            let world_before = wrap_angle(self.sectors.tooth_angle(tooth) + prev_angle);
            // Wrap-safe distance from the tooth to the pointer in the
            // direction of motion; crossed iff the sweep covered it
            let gap = if forward {
                wrap_angle(POINTER_ANGLE - world_before)
            } else {
                wrap_angle(world_before - POINTER_ANGLE)
            };
            if gap > 0.0 && gap <= swept {
                self.react_to_tooth(tooth);
                break;
            }
        }
    }

    /// Velocity-banded tooth reaction. Fast wheels barely notice a tooth;
    /// near the stop the stochastic branches produce the "almost landed on
    /// X but bounced to Y" endings.
    fn react_to_tooth(&mut self, tooth: usize) {
        let table = self.tuning.reaction;
        let mult = self.tuning.damping_multiplier(self.sectors.count());
        let speed = self.physics.velocity.abs();

        let intensity = if speed > table.fast_over {
            self.apply_damp(table.fast, mult)
        } else if speed > table.medium_over {
            self.apply_damp(table.medium, mult)
        } else if speed > table.slow_over {
            self.apply_damp(table.slow, mult)
        } else if speed > table.crawl_over {
            self.apply_damp(table.crawl, mult)
        } else if speed > table.drama_over {
            self.apply_drama(table.drama, mult)
        } else {
            self.apply_drama(table.critical, mult)
        };

        self.physics.last_tooth_hit = Some(tooth);
        self.physics.tooth_cooldown = self.tuning.tooth_cooldown;

        if let Some(hook) = self.hooks.hit.as_mut() {
            hook(intensity);
        }
        if let Some(hook) = self.hooks.pointer.as_mut() {
            let after = self.physics.velocity;
            let magnitude = if after.abs() > 5.0 {
                0.25
            } else if after.abs() > 2.0 {
                0.20
            } else {
                0.15
            };
            // The pointer kicks back against the wheel's motion
            let direction = if after > 0.0 { -1.0 } else { 1.0 };
            hook(magnitude, direction);
        }
    }

    fn apply_damp(&mut self, band: DampBand, mult: f32) -> f32 {
        let jitter = self.rng.random::<f32>();
        self.physics.velocity *= 1.0 - (band.base + jitter * band.jitter) * mult;
        band.intensity
    }

    fn apply_drama(&mut self, band: DramaBand, mult: f32) -> f32 {
        let roll = self.rng.random::<f32>();
        if roll < band.push_chance {
            // The tooth nudges the wheel past a near-stop point
            let dir = if self.physics.velocity > 0.0 { 1.0 } else { -1.0 };
            let push = band.push.sample(self.rng.random::<f32>());
            self.physics.add_impulse(dir * push, self.tuning.max_speed);
            band.push_intensity
        } else if roll < band.push_chance + band.bounce_chance {
            // The wheel rocks backward off the tooth
            let retention = band.bounce.sample(self.rng.random::<f32>());
            self.physics.velocity = -self.physics.velocity * retention;
            band.bounce_intensity
        } else {
            self.apply_damp(band.damp, mult)
        }
    }

    fn finish_spin(&mut self) {
        let index = self.sectors.index_at(self.physics.angle).unwrap_or(0);
        let label = self
            .sectors
            .label(index)
            .unwrap_or_default()
            .to_owned();

        self.phase = WheelPhase::Stopped;
        self.chaos = None;
        self.last_outcome = Some(SpinOutcome {
            index,
            label: label.clone(),
        });

        if let Some(next) = self.pending_labels.take() {
            log::debug!("applying queued label change ({} sectors)", next.count());
            self.sectors = next;
        }

        log::debug!("spin stopped: index={index} label={label:?}");
        if let Some(hook) = self.hooks.result.as_mut() {
            hook(&label, index);
        }
    }

    // --- injected collaborators ---

    /// Called once per registered tooth collision with a normalized
    /// intensity in [0, 1] (audio / haptics / sparks)
    pub fn on_hit(&mut self, hook: impl FnMut(f32) + 'static) {
        self.hooks.hit = Some(Box::new(hook));
    }

    /// Called exactly once per completed spin with the winning label and
    /// sector index
    pub fn on_result(&mut self, hook: impl FnMut(&str, usize) + 'static) {
        self.hooks.result = Some(Box::new(hook));
    }

    /// Called per collision with deflection magnitude and direction, for a
    /// pointer-bounce animation
    pub fn on_pointer_deflect(&mut self, hook: impl FnMut(f32, f32) + 'static) {
        self.hooks.pointer = Some(Box::new(hook));
    }

    // --- observable state for a polling renderer ---

    pub fn angle(&self) -> f32 {
        self.physics.angle
    }

    pub fn velocity(&self) -> f32 {
        self.physics.velocity
    }

    pub fn phase(&self) -> WheelPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase == WheelPhase::Spinning
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.count()
    }

    pub fn labels(&self) -> &[String] {
        self.sectors.labels()
    }

    /// Index highlighted after the last completed spin
    pub fn active_index(&self) -> Option<usize> {
        self.last_outcome.as_ref().map(|o| o.index)
    }

    pub fn last_outcome(&self) -> Option<&SpinOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}
