//! Step-adjustment mechanics: interval selection, capacity deltas,
//! and the cooldown gate.

use tracing::debug;

use crate::plan::CapacityBounds;
use crate::types::StepAdjustment;

/// Pick the adjustment whose `[lower, upper)` interval contains the
/// breach magnitude. Returns `None` when no interval matches.
pub fn select_step_adjustment(adjustments: &[StepAdjustment], breach: f64) -> Option<i32> {
    for step in adjustments {
        let above_lower = breach >= step.lower_bound;
        let below_upper = step.upper_bound.is_none_or(|upper| breach < upper);
        if above_lower && below_upper {
            return Some(step.adjustment);
        }
    }
    None
}

/// Apply a capacity delta to the current count, clamped into bounds.
pub fn desired_capacity(bounds: CapacityBounds, current: u32, adjustment: i32) -> u32 {
    let raw = if adjustment >= 0 {
        current.saturating_add(adjustment as u32)
    } else {
        current.saturating_sub(adjustment.unsigned_abs())
    };
    raw.clamp(bounds.min, bounds.max)
}

/// Allows at most one adjustment per cooldown window.
#[derive(Debug, Default)]
pub struct CooldownGate {
    last_adjustment_epoch: Option<u64>,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and records the adjustment if the cooldown window
    /// has elapsed since the last one.
    pub fn try_adjust(&mut self, now_epoch: u64, cooldown_secs: u64) -> bool {
        if let Some(last) = self.last_adjustment_epoch
            && now_epoch.saturating_sub(last) < cooldown_secs
        {
            debug!(
                last,
                now_epoch, cooldown_secs, "adjustment suppressed by cooldown"
            );
            return false;
        }
        self.last_adjustment_epoch = Some(now_epoch);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_steps() -> Vec<StepAdjustment> {
        vec![
            StepAdjustment {
                lower_bound: 0.0,
                upper_bound: Some(300.0),
                adjustment: 2,
            },
            StepAdjustment {
                lower_bound: 300.0,
                upper_bound: None,
                adjustment: 4,
            },
        ]
    }

    #[test]
    fn breach_in_first_interval_selects_small_step() {
        assert_eq!(select_step_adjustment(&reference_steps(), 150.0), Some(2));
    }

    #[test]
    fn breach_of_350_selects_the_large_step() {
        // Interval >300 wins, not the 0–300 one.
        assert_eq!(select_step_adjustment(&reference_steps(), 350.0), Some(4));
    }

    #[test]
    fn interval_lower_bound_is_inclusive() {
        assert_eq!(select_step_adjustment(&reference_steps(), 0.0), Some(2));
        assert_eq!(select_step_adjustment(&reference_steps(), 300.0), Some(4));
    }

    #[test]
    fn breach_below_all_intervals_selects_nothing() {
        let steps = vec![StepAdjustment {
            lower_bound: 100.0,
            upper_bound: None,
            adjustment: 2,
        }];
        assert_eq!(select_step_adjustment(&steps, 50.0), None);
    }

    #[test]
    fn desired_capacity_clamps_to_bounds() {
        let bounds = CapacityBounds { min: 1, max: 5 };
        assert_eq!(desired_capacity(bounds, 4, 4), 5);
        assert_eq!(desired_capacity(bounds, 3, -4), 1);
        assert_eq!(desired_capacity(bounds, 2, 2), 4);
    }

    #[test]
    fn cooldown_gate_allows_first_adjustment() {
        let mut gate = CooldownGate::new();
        assert!(gate.try_adjust(1000, 60));
    }

    #[test]
    fn cooldown_gate_suppresses_within_window() {
        let mut gate = CooldownGate::new();
        assert!(gate.try_adjust(1000, 60));
        assert!(!gate.try_adjust(1059, 60));
        assert!(gate.try_adjust(1060, 60));
    }
}
