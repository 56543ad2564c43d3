//! Error types for policy validation.

use thiserror::Error;

/// Result type alias for policy operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Validation failures for scaling policies and targets.
#[derive(Debug, Error, PartialEq)]
pub enum PolicyError {
    #[error("step scaling policy has no adjustments")]
    EmptySteps,

    #[error("step adjustment {index} is out of order")]
    UnorderedSteps { index: usize },

    #[error("step adjustment {index} overlaps the previous interval")]
    OverlappingSteps { index: usize },

    #[error("step adjustment {index} has an empty or non-finite interval")]
    InvalidStepBounds { index: usize },

    #[error("scheduled action at epoch {at_epoch} is not in the future (now {now_epoch})")]
    ScheduleInPast { at_epoch: u64, now_epoch: u64 },

    #[error("target value {value} must be finite and positive")]
    InvalidTarget { value: f64 },

    #[error("capacity bounds invalid: min {min} > max {max}")]
    InvalidCapacityBounds { min: u32, max: u32 },

    #[error("at most one target-tracking policy may be attached to a target")]
    MultipleTargetTracking,
}
