//! Collection ledger
//!
//! Tallies captured debris per source planet and the warp-core adjustments the
//! player has made. The relative mass is never cached: it is recomputed from
//! the full history on every read.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::game::state::{CollectedDebris, DebrisSource};

#[derive(Debug, Clone, Default)]
pub struct CollectionLedger {
    top: Vec<CollectedDebris>,
    bottom: Vec<CollectedDebris>,
    /// One entry per warp core used; rarely more than a handful
    adjustments: SmallVec<[f32; 4]>,
}

/// Serializable copy of the ledger handed to the presentation layer on crash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub top_total: f32,
    pub bottom_total: f32,
    pub top_count: usize,
    pub bottom_count: usize,
    pub adjustments: Vec<f32>,
    pub relative_mass: f32,
}

impl CollectionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a capture to its source's sequence
    pub fn add(&mut self, entry: CollectedDebris) {
        match entry.source {
            DebrisSource::Top => self.top.push(entry),
            DebrisSource::Bottom => self.bottom.push(entry),
        }
    }

    /// Push the negation of the current relative mass, zeroing the balance.
    /// Raw per-source totals are untouched.
    pub fn add_warp_core_adjustment(&mut self) {
        let adjustment = -self.relative_mass();
        self.adjustments.push(adjustment);
    }

    /// `Σtop − Σbottom + Σadjustments`
    pub fn relative_mass(&self) -> f32 {
        self.top_total() - self.bottom_total() + self.adjustments.iter().sum::<f32>()
    }

    pub fn top_total(&self) -> f32 {
        self.top.iter().map(|e| e.mass).sum()
    }

    pub fn bottom_total(&self) -> f32 {
        self.bottom.iter().map(|e| e.mass).sum()
    }

    pub fn entries(&self, source: DebrisSource) -> &[CollectedDebris] {
        match source {
            DebrisSource::Top => &self.top,
            DebrisSource::Bottom => &self.bottom,
        }
    }

    pub fn adjustments(&self) -> &[f32] {
        &self.adjustments
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.bottom.is_empty() && self.adjustments.is_empty()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            top_total: self.top_total(),
            bottom_total: self.bottom_total(),
            top_count: self.top.len(),
            bottom_count: self.bottom.len(),
            adjustments: self.adjustments.to_vec(),
            relative_mass: self.relative_mass(),
        }
    }
}
