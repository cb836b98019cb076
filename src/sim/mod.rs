//! Deterministic simulation module
//!
//! All spin logic lives here. This module must be pure and deterministic:
//! - Tick-driven only (the caller owns the clock)
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod chaos;
pub mod engine;
pub mod physics;
pub mod sectors;

pub use chaos::{ChaosEvent, ChaosKind, ChaosSchedule};
pub use engine::{SpinOutcome, WheelEngine, WheelPhase};
pub use physics::SpinPhysics;
pub use sectors::SectorSet;
