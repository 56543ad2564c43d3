//! surge-scaling — declarative scaling policies.
//!
//! Models the rules an orchestration platform evaluates to change the
//! instance count of a scalable service. Nothing here runs a control
//! loop; the platform observes metrics, matches them against these
//! policies, and moves the desired-count knob.
//!
//! # Policy kinds
//!
//! ```text
//! TargetTracking { metric, target_value }
//!     hold the metric near the set point (platform computes deltas)
//!
//! StepScaling { adjustments, cooldown_secs }
//!     alarm breach of magnitude m → adjustment whose [lower, upper)
//!     interval contains m; at most one adjustment per cooldown window
//!
//! Scheduled { at_epoch, min_capacity, max_capacity }
//!     force capacity bounds from a fixed future timestamp onward
//! ```
//!
//! Scheduled actions take precedence while active: `effective_bounds`
//! returns the bounds of the most recent scheduled action at or before
//! the given time, and dynamic adjustments clamp into them.

pub mod error;
pub mod plan;
pub mod step;
pub mod types;

pub use error::{PolicyError, PolicyResult};
pub use plan::{CapacityBounds, ScaleDecision, ScalingPlan};
pub use step::{CooldownGate, desired_capacity, select_step_adjustment};
pub use types::{Alarm, Comparison, ScalableTarget, ScalingMetric, ScalingPolicy, StepAdjustment};
