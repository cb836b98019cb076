//! Sector geometry and label bookkeeping
//!
//! In wheel space, sector boundaries ("teeth") sit at fixed angles derived
//! from an anchor offset chosen so the boundary between the last and first
//! sector lands half a segment before the pointer. The wheel rotates
//! beneath the stationary pointer; a tooth's world angle is its static
//! angle plus the current rotation.

use std::f32::consts::TAU;

use rand::RngCore;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SECTORS, POINTER_ANGLE};
use crate::wrap_angle;

/// Immutable-per-spin set of labeled sectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorSet {
    labels: Vec<String>,
    segment_angle: f32,
    anchor_offset: f32,
}

impl Default for SectorSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl SectorSet {
    /// A wheel with no sectors (idle forever, spin impossible)
    pub fn empty() -> Self {
        Self {
            labels: Vec::new(),
            segment_angle: TAU,
            anchor_offset: POINTER_ANGLE,
        }
    }

    /// Build from a raw label list: blank entries are dropped and the
    /// result is capped at [`MAX_SECTORS`].
    pub fn from_labels<S: AsRef<str>>(raw: &[S]) -> Self {
        let labels: Vec<String> = raw
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| !s.trim().is_empty())
            .take(MAX_SECTORS)
            .map(str::to_owned)
            .collect();

        if labels.is_empty() {
            return Self::empty();
        }

        let segment_angle = TAU / labels.len() as f32;
        Self {
            segment_angle,
            anchor_offset: POINTER_ANGLE - segment_angle / 2.0,
            labels,
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    #[inline]
    pub fn segment_angle(&self) -> f32 {
        self.segment_angle
    }

    #[inline]
    pub fn anchor_offset(&self) -> f32 {
        self.anchor_offset
    }

    /// Static (wheel-space) angle of tooth `i`, the boundary trailing
    /// sector `i`
    pub fn tooth_angle(&self, index: usize) -> f32 {
        wrap_angle(self.anchor_offset + (index as f32 + 1.0) * self.segment_angle)
    }

    /// Sector under the pointer at the given wheel rotation
    pub fn index_at(&self, rotation: f32) -> Option<usize> {
        if self.labels.is_empty() {
            return None;
        }
        let relative = wrap_angle(POINTER_ANGLE - rotation - self.anchor_offset);
        Some((relative / self.segment_angle) as usize % self.labels.len())
    }

    /// Rotation that centers sector `index` under the pointer
    pub fn rotation_for_index(&self, index: usize) -> f32 {
        let clamped = if self.labels.is_empty() { 0 } else { index % self.labels.len() };
        wrap_angle(POINTER_ANGLE - self.anchor_offset - (clamped as f32 + 0.5) * self.segment_angle)
    }

    /// Re-deal labels onto sectors, `passes` Fisher-Yates rounds
    pub fn shuffle(&mut self, rng: &mut dyn RngCore, passes: usize) {
        for _ in 0..passes {
            self.labels.shuffle(rng);
        }
    }
}
