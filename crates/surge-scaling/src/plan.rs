//! A target with its attached policies and alarm.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PolicyError, PolicyResult};
use crate::step::{CooldownGate, desired_capacity, select_step_adjustment};
use crate::types::{Alarm, ScalableTarget, ScalingPolicy};

/// Capacity bounds in force at a point in time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CapacityBounds {
    pub min: u32,
    pub max: u32,
}

/// A scaling decision for the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleDecision {
    /// Scale to the specified instance count.
    ScaleTo(u32),
    /// No change needed.
    NoChange,
}

/// Everything the platform needs to scale one service: the target,
/// its policies, and the alarm that drives step scaling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalingPlan {
    pub target: ScalableTarget,
    #[serde(default)]
    pub policies: Vec<ScalingPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm: Option<Alarm>,
}

impl ScalingPlan {
    /// Validate the target and every attached policy.
    pub fn validate(&self, now_epoch: u64) -> PolicyResult<()> {
        self.target.validate()?;

        let mut tracking_policies = 0;
        for policy in &self.policies {
            policy.validate(now_epoch)?;
            if matches!(policy, ScalingPolicy::TargetTracking { .. }) {
                tracking_policies += 1;
            }
        }
        if tracking_policies > 1 {
            return Err(PolicyError::MultipleTargetTracking);
        }

        Ok(())
    }

    /// Capacity bounds in force at `now_epoch`.
    ///
    /// The most recent scheduled action at or before `now` overrides
    /// the target's static bounds; with none active, the static bounds
    /// apply.
    pub fn effective_bounds(&self, now_epoch: u64) -> CapacityBounds {
        let mut bounds = CapacityBounds {
            min: self.target.min_capacity,
            max: self.target.max_capacity,
        };

        let mut latest: Option<u64> = None;
        for policy in &self.policies {
            if let ScalingPolicy::Scheduled {
                at_epoch,
                min_capacity,
                max_capacity,
            } = policy
                && *at_epoch <= now_epoch
                && latest.is_none_or(|l| *at_epoch > l)
            {
                latest = Some(*at_epoch);
                bounds = CapacityBounds {
                    min: *min_capacity,
                    max: *max_capacity,
                };
            }
        }

        bounds
    }

    /// Evaluate the step-scaling policy against an observed metric
    /// value and return a decision.
    ///
    /// Returns `NoChange` unless the alarm is breached, an interval
    /// matches the breach magnitude, the clamped result differs from
    /// the current count, and the cooldown window has elapsed. The
    /// cooldown is only consumed when an adjustment is actually made.
    pub fn step_decision(
        &self,
        observed: f64,
        current: u32,
        now_epoch: u64,
        gate: &mut CooldownGate,
    ) -> ScaleDecision {
        let Some(alarm) = &self.alarm else {
            return ScaleDecision::NoChange;
        };

        let Some((adjustments, cooldown_secs)) = self.policies.iter().find_map(|p| match p {
            ScalingPolicy::StepScaling {
                adjustments,
                cooldown_secs,
            } => Some((adjustments, *cooldown_secs)),
            _ => None,
        }) else {
            return ScaleDecision::NoChange;
        };

        if !alarm.is_breached(observed) {
            return ScaleDecision::NoChange;
        }

        let breach = alarm.breach_magnitude(observed);
        let Some(adjustment) = select_step_adjustment(adjustments, breach) else {
            return ScaleDecision::NoChange;
        };

        let bounds = self.effective_bounds(now_epoch);
        let desired = desired_capacity(bounds, current, adjustment);
        if desired == current {
            return ScaleDecision::NoChange;
        }

        if !gate.try_adjust(now_epoch, cooldown_secs) {
            return ScaleDecision::NoChange;
        }

        debug!(
            service = %self.target.service,
            from = current,
            to = desired,
            breach,
            adjustment,
            "step scaling decision"
        );
        ScaleDecision::ScaleTo(desired)
    }
}
