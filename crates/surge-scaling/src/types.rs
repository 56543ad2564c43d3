//! Domain types for the scaling model.
//!
//! All types serialize to/from JSON and TOML so plans can live in
//! declarative plan files.

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, PolicyResult};

/// The scalable unit: a named service and its static capacity bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalableTarget {
    pub service: String,
    pub min_capacity: u32,
    pub max_capacity: u32,
}

impl ScalableTarget {
    pub fn validate(&self) -> PolicyResult<()> {
        if self.min_capacity > self.max_capacity {
            return Err(PolicyError::InvalidCapacityBounds {
                min: self.min_capacity,
                max: self.max_capacity,
            });
        }
        Ok(())
    }
}

/// Metric a policy or alarm observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMetric {
    /// Average CPU utilization across instances, in percent.
    CpuUtilization,
    /// Requests per instance over the observation window.
    RequestCountPerInstance,
}

/// Threshold comparison for alarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    GreaterThanOrEqual,
    GreaterThan,
    LessThan,
    LessThanOrEqual,
}

/// One interval of a step-scaling policy.
///
/// Bounds are offsets above the alarm threshold; `upper_bound: None`
/// means the interval is open-ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepAdjustment {
    pub lower_bound: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
    /// Capacity delta to apply (negative scales in).
    pub adjustment: i32,
}

/// A scaling rule attached to a target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalingPolicy {
    /// Hold `metric` near `target_value`; the platform computes the
    /// adjustments.
    TargetTracking {
        metric: ScalingMetric,
        target_value: f64,
    },
    /// Apply a capacity delta sized by the alarm breach magnitude.
    StepScaling {
        adjustments: Vec<StepAdjustment>,
        cooldown_secs: u64,
    },
    /// Force capacity bounds from a fixed timestamp onward.
    Scheduled {
        at_epoch: u64,
        min_capacity: u32,
        max_capacity: u32,
    },
}

impl ScalingPolicy {
    /// Validate this policy. `now_epoch` anchors the check that
    /// scheduled actions lie in the future.
    pub fn validate(&self, now_epoch: u64) -> PolicyResult<()> {
        match self {
            ScalingPolicy::TargetTracking { target_value, .. } => {
                if !target_value.is_finite() || *target_value <= 0.0 {
                    return Err(PolicyError::InvalidTarget {
                        value: *target_value,
                    });
                }
                Ok(())
            }
            ScalingPolicy::StepScaling { adjustments, .. } => validate_steps(adjustments),
            ScalingPolicy::Scheduled {
                at_epoch,
                min_capacity,
                max_capacity,
            } => {
                if *at_epoch <= now_epoch {
                    return Err(PolicyError::ScheduleInPast {
                        at_epoch: *at_epoch,
                        now_epoch,
                    });
                }
                if min_capacity > max_capacity {
                    return Err(PolicyError::InvalidCapacityBounds {
                        min: *min_capacity,
                        max: *max_capacity,
                    });
                }
                Ok(())
            }
        }
    }
}

/// Step intervals must be ordered, non-overlapping, and non-empty.
/// Only the last interval may be open-ended.
fn validate_steps(adjustments: &[StepAdjustment]) -> PolicyResult<()> {
    if adjustments.is_empty() {
        return Err(PolicyError::EmptySteps);
    }

    for (index, step) in adjustments.iter().enumerate() {
        if !step.lower_bound.is_finite() {
            return Err(PolicyError::InvalidStepBounds { index });
        }
        match step.upper_bound {
            Some(upper) => {
                if !upper.is_finite() || upper <= step.lower_bound {
                    return Err(PolicyError::InvalidStepBounds { index });
                }
            }
            None => {
                if index != adjustments.len() - 1 {
                    // An open-ended interval swallows everything after it.
                    return Err(PolicyError::OverlappingSteps { index: index + 1 });
                }
            }
        }

        if index > 0 {
            let prev = &adjustments[index - 1];
            if step.lower_bound < prev.lower_bound {
                return Err(PolicyError::UnorderedSteps { index });
            }
            match prev.upper_bound {
                Some(upper) if step.lower_bound < upper => {
                    return Err(PolicyError::OverlappingSteps { index });
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// A threshold rule over an observed metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alarm {
    pub metric: ScalingMetric,
    pub comparison: Comparison,
    pub threshold: f64,
    /// Observation window in seconds.
    pub period_secs: u64,
    /// Consecutive periods the threshold must hold before triggering.
    pub evaluation_periods: u32,
}

impl Alarm {
    /// Whether an observed value trips the alarm.
    pub fn is_breached(&self, observed: f64) -> bool {
        match self.comparison {
            Comparison::GreaterThanOrEqual => observed >= self.threshold,
            Comparison::GreaterThan => observed > self.threshold,
            Comparison::LessThan => observed < self.threshold,
            Comparison::LessThanOrEqual => observed <= self.threshold,
        }
    }

    /// How far past the threshold the observation is. Step intervals
    /// are matched against this magnitude.
    pub fn breach_magnitude(&self, observed: f64) -> f64 {
        match self.comparison {
            Comparison::GreaterThanOrEqual | Comparison::GreaterThan => {
                (observed - self.threshold).max(0.0)
            }
            Comparison::LessThan | Comparison::LessThanOrEqual => {
                (self.threshold - observed).max(0.0)
            }
        }
    }
}
