//! Error types for provisioning plans.

use thiserror::Error;

use surge_scaling::PolicyError;

/// Result type alias for plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that can occur while loading or validating a plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse plan file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("duplicate resource name {0:?}")]
    DuplicateResource(String),

    #[error("resource {resource:?} depends on unknown resource {dependency:?}")]
    UnknownDependency {
        resource: String,
        dependency: String,
    },

    #[error("resource {resource:?} references {reference:?} without declaring it in depends_on")]
    UndeclaredReference { resource: String, reference: String },

    #[error("dependency cycle involving resource {0:?}")]
    DependencyCycle(String),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}
