//! Request admission ceilings.

use crate::error::{LoadError, LoadResult};

/// Upper bounds on what a single request may ask for.
///
/// The defaults are deliberately generous; the limits exist so one
/// request cannot ask for more memory than the host has or pin a
/// worker for hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadLimits {
    /// Maximum CPU burn iterations per request.
    pub max_iterations: u64,
    /// Maximum ballast size per request, in megabytes.
    pub max_memory_mb: u64,
}

impl Default for LoadLimits {
    fn default() -> Self {
        Self {
            max_iterations: 1_000_000,
            max_memory_mb: 4096,
        }
    }
}

impl LoadLimits {
    /// Check a CPU burn request against the iteration ceiling.
    pub fn admit_cpu(&self, iterations: u64) -> LoadResult<()> {
        if iterations > self.max_iterations {
            return Err(LoadError::LimitExceeded {
                param: "iterations",
                requested: iterations,
                limit: self.max_iterations,
            });
        }
        Ok(())
    }

    /// Check a ballast request against the memory ceiling.
    pub fn admit_memory(&self, memory_mb: u64) -> LoadResult<()> {
        if memory_mb > self.max_memory_mb {
            return Err(LoadError::LimitExceeded {
                param: "memory_mb",
                requested: memory_mb,
                limit: self.max_memory_mb,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_admit_reference_inputs() {
        let limits = LoadLimits::default();
        assert!(limits.admit_cpu(10).is_ok());
        assert!(limits.admit_memory(100).is_ok());
    }

    #[test]
    fn over_limit_is_rejected_with_context() {
        let limits = LoadLimits {
            max_iterations: 100,
            max_memory_mb: 64,
        };

        match limits.admit_cpu(101) {
            Err(LoadError::LimitExceeded {
                param,
                requested,
                limit,
            }) => {
                assert_eq!(param, "iterations");
                assert_eq!(requested, 101);
                assert_eq!(limit, 100);
            }
            other => panic!("expected LimitExceeded, got {other:?}"),
        }

        assert!(limits.admit_memory(65).is_err());
    }

    #[test]
    fn limit_boundary_is_inclusive() {
        let limits = LoadLimits {
            max_iterations: 100,
            max_memory_mb: 64,
        };
        assert!(limits.admit_cpu(100).is_ok());
        assert!(limits.admit_memory(64).is_ok());
    }
}
