//! Plan loading, validation, and dependency ordering.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::resources::ResourceSpec;

/// A provisioning plan: resources in declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProvisionPlan {
    #[serde(default, rename = "resource")]
    pub resources: Vec<ResourceSpec>,
}

impl ProvisionPlan {
    /// Parse a plan from TOML text.
    pub fn from_toml_str(content: &str) -> PlanResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a plan from a TOML file.
    pub fn from_file(path: &Path) -> PlanResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate the plan.
    ///
    /// Checks name uniqueness, that every `depends_on` entry and named
    /// reference resolves, that references are also declared as
    /// dependencies, and that embedded scaling plans are themselves
    /// valid (scheduled actions anchored at `now_epoch`).
    pub fn validate(&self, now_epoch: u64) -> PlanResult<()> {
        let mut names = HashSet::new();
        for resource in &self.resources {
            if !names.insert(resource.name()) {
                return Err(PlanError::DuplicateResource(resource.name().to_string()));
            }
        }

        for resource in &self.resources {
            let declared: HashSet<&str> =
                resource.depends_on().iter().map(String::as_str).collect();

            for dependency in resource.depends_on() {
                if !names.contains(dependency.as_str()) {
                    return Err(PlanError::UnknownDependency {
                        resource: resource.name().to_string(),
                        dependency: dependency.clone(),
                    });
                }
            }

            for reference in resource.references() {
                if !names.contains(reference) {
                    return Err(PlanError::UnknownDependency {
                        resource: resource.name().to_string(),
                        dependency: reference.to_string(),
                    });
                }
                if !declared.contains(reference) {
                    return Err(PlanError::UndeclaredReference {
                        resource: resource.name().to_string(),
                        reference: reference.to_string(),
                    });
                }
            }

            if let ResourceSpec::Scaling(spec) = resource {
                spec.plan.validate(now_epoch)?;
            }
        }

        Ok(())
    }

    /// Resources in dependency order.
    ///
    /// Kahn's algorithm, stable: among the resources whose
    /// dependencies are satisfied, declaration order decides.
    pub fn ordered(&self) -> PlanResult<Vec<&ResourceSpec>> {
        let names: HashSet<&str> = self.resources.iter().map(|r| r.name()).collect();
        let mut emitted: HashSet<&str> = HashSet::new();
        let mut ordered = Vec::with_capacity(self.resources.len());

        while emitted.len() < self.resources.len() {
            let mut progressed = false;

            for resource in &self.resources {
                if emitted.contains(resource.name()) {
                    continue;
                }
                // Dependencies outside the plan are validate()'s
                // problem; here they count as satisfied.
                let ready = resource
                    .depends_on()
                    .iter()
                    .all(|d| emitted.contains(d.as_str()) || !names.contains(d.as_str()));
                if ready {
                    emitted.insert(resource.name());
                    ordered.push(resource);
                    progressed = true;
                }
            }

            if !progressed {
                // Every remaining resource waits on another remaining
                // one: a cycle. Report the first by declaration order.
                let stuck = self
                    .resources
                    .iter()
                    .find(|r| !emitted.contains(r.name()))
                    .map(|r| r.name().to_string())
                    .unwrap_or_default();
                return Err(PlanError::DependencyCycle(stuck));
            }
        }

        Ok(ordered)
    }
}
