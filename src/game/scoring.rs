//! End-of-session scoring
//!
//! Combines distance travelled with the raw per-source collected mass.
//! Warp-core adjustments do not affect the score.

use serde::{Deserialize, Serialize};

use crate::game::constants::scoring::{FLOOR_TOLERANCE, MASS_SCALE};
use crate::game::ledger::CollectionLedger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub distance: u64,
    pub bottom_mass_scaled: u64,
    pub top_mass_scaled: u64,
    pub total: u64,
}

/// `floor(mass * 1000)`, with a small tolerance so f32 sums land on the
/// integer they were meant to be
fn scale_mass(total: f32) -> u64 {
    let scaled = total as f64 * MASS_SCALE as f64 + FLOOR_TOLERANCE as f64;
    if scaled <= 0.0 {
        0
    } else {
        scaled.floor() as u64
    }
}

pub fn compute_final_score(distance: u64, bottom_total: f32, top_total: f32) -> FinalScore {
    let bottom_mass_scaled = scale_mass(bottom_total);
    let top_mass_scaled = scale_mass(top_total);
    FinalScore {
        distance,
        bottom_mass_scaled,
        top_mass_scaled,
        total: distance + bottom_mass_scaled + top_mass_scaled,
    }
}

pub fn score_ledger(distance: u64, ledger: &CollectionLedger) -> FinalScore {
    compute_final_score(distance, ledger.bottom_total(), ledger.top_total())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{CollectedDebris, DebrisSource};

    #[test]
    fn test_score_scenario() {
        let score = compute_final_score(500, 0.25, 0.1);
        assert_eq!(score.bottom_mass_scaled, 250);
        assert_eq!(score.top_mass_scaled, 100);
        assert_eq!(score.total, 850);
    }

    #[test]
    fn test_empty_ledger_scores_distance() {
        let score = score_ledger(42, &CollectionLedger::new());
        assert_eq!(score.total, 42);
    }

    #[test]
    fn test_float_sums_floor_to_intended_value() {
        let mut ledger = CollectionLedger::new();
        for mass in [0.3, 0.4] {
            ledger.add(CollectedDebris { source: DebrisSource::Top, mass });
        }
        let score = score_ledger(0, &ledger);
        assert_eq!(score.top_mass_scaled, 700);
    }

    #[test]
    fn test_fractional_mass_floors() {
        let score = compute_final_score(0, 0.2567, 0.0);
        assert_eq!(score.bottom_mass_scaled, 256);
    }

    #[test]
    fn test_warp_cores_do_not_change_score() {
        let mut ledger = CollectionLedger::new();
        ledger.add(CollectedDebris { source: DebrisSource::Bottom, mass: 0.5 });
        let before = score_ledger(10, &ledger);
        ledger.add_warp_core_adjustment();
        assert_eq!(score_ledger(10, &ledger), before);
    }
}
