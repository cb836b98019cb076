//! Chaos event scheduling
//!
//! Chaos mode injects a bounded pool of randomized velocity perturbations
//! into an in-flight spin. The schedule is generated up front at spin time,
//! scattered across a fixed window after a warm-up period, and processed in
//! non-decreasing fire order, each event exactly once. Magnitude ranges are
//! fixed, so damping always wins eventually.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::tuning::ChaosTuning;

/// The seven perturbation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChaosKind {
    /// Impulse along the current spin direction
    Boost,
    /// Multiply velocity by a sub-1 factor
    Brake,
    /// Negate velocity, retaining a fraction of speed
    Reverse,
    /// Freeze the wheel briefly, then resume at the stored velocity
    Pause,
    /// Boost, but much bigger
    MegaBoost,
    /// Reverse now and again a moment later
    DoubleReverse,
    /// Large impulse in a freshly random direction
    Hurricane,
}

/// Kinds eligible for the random scatter pool (pause is rationed separately)
const SCATTER_KINDS: [ChaosKind; 6] = [
    ChaosKind::Boost,
    ChaosKind::Brake,
    ChaosKind::Reverse,
    ChaosKind::MegaBoost,
    ChaosKind::DoubleReverse,
    ChaosKind::Hurricane,
];

/// One scheduled perturbation. `magnitude` is kind-specific: an impulse for
/// the boost family, a retention factor for brake/reverse, a duration in
/// milliseconds for pause.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChaosEvent {
    pub kind: ChaosKind,
    /// Milliseconds after spin start
    pub fire_at_ms: f32,
    pub magnitude: f32,
    pub executed: bool,
}

impl ChaosEvent {
    fn new(kind: ChaosKind, fire_at_ms: f32, magnitude: f32) -> Self {
        Self { kind, fire_at_ms, magnitude, executed: false }
    }
}

/// A spin's worth of chaos events, sorted by fire time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChaosSchedule {
    events: Vec<ChaosEvent>,
}

impl ChaosSchedule {
    /// Generate a fresh schedule: a guaranteed batch of every scatter kind,
    /// a rare pause or two, and an extra random scatter on top.
    pub fn generate(rng: &mut dyn RngCore, tuning: &ChaosTuning) -> Self {
        let mut events = Vec::new();

        for kind in SCATTER_KINDS {
            for _ in 0..tuning.guaranteed_per_kind {
                let fire = tuning.warmup_ms + rng.random::<f32>() * tuning.window_ms;
                events.push(ChaosEvent::new(kind, fire, sample_magnitude(kind, rng, tuning)));
            }
        }

        if rng.random::<f32>() < tuning.pause_chance {
            let pauses = 1 + (rng.random::<f32>() * 2.0) as usize;
            for _ in 0..pauses {
                let fire = tuning.warmup_ms + rng.random::<f32>() * tuning.window_ms;
                let duration = tuning.pause_duration_ms.sample(rng.random::<f32>());
                events.push(ChaosEvent::new(ChaosKind::Pause, fire, duration));
            }
        }

        let extras = tuning.extra_min + (rng.random::<f32>() * tuning.extra_span as f32) as usize;
        for _ in 0..extras {
            let kind = SCATTER_KINDS[rng.random_range(0..SCATTER_KINDS.len())];
            // Scatter starts slightly before the main window but never
            // ahead of the warm-up contract
            let fire = (tuning.warmup_ms - 200.0 + rng.random::<f32>() * (tuning.window_ms - 300.0))
                .max(tuning.warmup_ms);
            events.push(ChaosEvent::new(kind, fire, sample_magnitude(kind, rng, tuning)));
        }

        events.sort_by(|a, b| a.fire_at_ms.total_cmp(&b.fire_at_ms));
        Self { events }
    }

    /// Pop the earliest due, unexecuted event, marking it executed
    pub fn next_due(&mut self, elapsed_ms: f32) -> Option<ChaosEvent> {
        let event = self
            .events
            .iter_mut()
            .find(|e| !e.executed && e.fire_at_ms <= elapsed_ms)?;
        event.executed = true;
        Some(*event)
    }

    /// Insert a follow-up event, keeping the schedule sorted
    pub fn insert(&mut self, event: ChaosEvent) {
        let pos = self
            .events
            .partition_point(|e| e.fire_at_ms <= event.fire_at_ms);
        self.events.insert(pos, event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[ChaosEvent] {
        &self.events
    }

    /// Fire time of the latest event, for termination bounds
    pub fn last_fire_ms(&self) -> f32 {
        self.events.last().map(|e| e.fire_at_ms).unwrap_or(0.0)
    }
}

fn sample_magnitude(kind: ChaosKind, rng: &mut dyn RngCore, tuning: &ChaosTuning) -> f32 {
    let range = match kind {
        ChaosKind::Boost => tuning.boost,
        ChaosKind::Brake => tuning.brake,
        ChaosKind::Reverse => tuning.reverse,
        ChaosKind::Pause => tuning.pause_duration_ms,
        ChaosKind::MegaBoost => tuning.mega_boost,
        ChaosKind::DoubleReverse => tuning.double_reverse,
        ChaosKind::Hurricane => tuning.hurricane,
    };
    range.sample(rng.random::<f32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn schedule(seed: u64) -> (ChaosSchedule, ChaosTuning) {
        let tuning = Tuning::default().chaos;
        let mut rng = Pcg32::seed_from_u64(seed);
        (ChaosSchedule::generate(&mut rng, &tuning), tuning)
    }

    #[test]
    fn test_sorted_by_fire_time() {
        let (sched, tuning) = schedule(1);
        for pair in sched.events().windows(2) {
            assert!(pair[0].fire_at_ms <= pair[1].fire_at_ms);
        }
        assert!(sched.last_fire_ms() <= tuning.warmup_ms + tuning.window_ms);
    }

    #[test]
    fn test_warmup_precedes_all_events() {
        for seed in 0..50 {
            let (sched, tuning) = schedule(seed);
            for event in sched.events() {
                assert!(
                    event.fire_at_ms >= tuning.warmup_ms,
                    "seed {seed}: event at {}ms inside warm-up",
                    event.fire_at_ms
                );
            }
        }
    }

    #[test]
    fn test_guaranteed_pool_present() {
        let (sched, tuning) = schedule(3);
        for kind in SCATTER_KINDS {
            let n = sched.events().iter().filter(|e| e.kind == kind).count();
            assert!(n >= tuning.guaranteed_per_kind, "{kind:?}: {n}");
        }
    }

    #[test]
    fn test_pool_size_bounded() {
        for seed in 0..20 {
            let (sched, tuning) = schedule(seed);
            let floor = SCATTER_KINDS.len() * tuning.guaranteed_per_kind + tuning.extra_min;
            let ceil = floor + tuning.extra_span + 2;
            assert!(sched.len() >= floor && sched.len() <= ceil, "seed {seed}: {}", sched.len());
        }
    }

    #[test]
    fn test_magnitudes_within_kind_ranges() {
        let (sched, tuning) = schedule(9);
        for event in sched.events() {
            let range = match event.kind {
                ChaosKind::Boost => tuning.boost,
                ChaosKind::Brake => tuning.brake,
                ChaosKind::Reverse => tuning.reverse,
                ChaosKind::Pause => tuning.pause_duration_ms,
                ChaosKind::MegaBoost => tuning.mega_boost,
                ChaosKind::DoubleReverse => tuning.double_reverse,
                ChaosKind::Hurricane => tuning.hurricane,
            };
            assert!(event.magnitude >= range.min);
            assert!(event.magnitude <= range.min + range.span);
        }
    }

    #[test]
    fn test_seed_deterministic() {
        let (a, _) = schedule(77);
        let (b, _) = schedule(77);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.events().iter().zip(b.events()) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.fire_at_ms, y.fire_at_ms);
            assert_eq!(x.magnitude, y.magnitude);
        }
    }

    #[test]
    fn test_next_due_fires_each_exactly_once_in_order() {
        let (mut sched, _) = schedule(5);
        let total = sched.len();
        let mut fired = 0;
        let mut last = f32::NEG_INFINITY;
        while let Some(event) = sched.next_due(f32::MAX) {
            assert!(event.fire_at_ms >= last);
            last = event.fire_at_ms;
            fired += 1;
        }
        assert_eq!(fired, total);
        assert!(sched.next_due(f32::MAX).is_none());
    }

    #[test]
    fn test_next_due_respects_elapsed() {
        let (mut sched, tuning) = schedule(5);
        assert!(sched.next_due(tuning.warmup_ms - 1.0).is_none());
    }

    #[test]
    fn test_insert_keeps_order() {
        let (mut sched, _) = schedule(5);
        sched.insert(ChaosEvent::new(ChaosKind::Reverse, 3000.0, 0.8));
        for pair in sched.events().windows(2) {
            assert!(pair[0].fire_at_ms <= pair[1].fire_at_ms);
        }
    }
}
