//! Typed resource specs.
//!
//! Every spec carries a unique `name` and an explicit `depends_on`
//! list; ordering is never inferred from which resources mention which.

use serde::{Deserialize, Serialize};

use surge_scaling::ScalingPlan;

/// A compute cluster the service runs on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterSpec {
    pub name: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// A load balancer fronting the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadBalancerSpec {
    pub name: String,
    pub listen_port: u16,
    /// CIDR blocks allowed to reach the listener.
    #[serde(default)]
    pub allowed_cidrs: Vec<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// A container image built from a local context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerImageSpec {
    pub name: String,
    pub build_context: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// The service itself: image, placement, and per-task resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSpec {
    pub name: String,
    pub cluster: String,
    pub image: String,
    pub load_balancer: String,
    pub container_port: u16,
    pub cpu_units: u32,
    pub memory_mb: u64,
    pub desired_count: u32,
    #[serde(default)]
    pub assign_public_ip: bool,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// A scaling plan attached to a service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalingSpec {
    pub name: String,
    pub plan: ScalingPlan,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// One resource in a provisioning plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceSpec {
    Cluster(ClusterSpec),
    LoadBalancer(LoadBalancerSpec),
    Image(ContainerImageSpec),
    Service(ServiceSpec),
    Scaling(ScalingSpec),
}

impl ResourceSpec {
    /// Unique name of this resource within the plan.
    pub fn name(&self) -> &str {
        match self {
            ResourceSpec::Cluster(s) => &s.name,
            ResourceSpec::LoadBalancer(s) => &s.name,
            ResourceSpec::Image(s) => &s.name,
            ResourceSpec::Service(s) => &s.name,
            ResourceSpec::Scaling(s) => &s.name,
        }
    }

    /// Declared dependencies, in declaration order.
    pub fn depends_on(&self) -> &[String] {
        match self {
            ResourceSpec::Cluster(s) => &s.depends_on,
            ResourceSpec::LoadBalancer(s) => &s.depends_on,
            ResourceSpec::Image(s) => &s.depends_on,
            ResourceSpec::Service(s) => &s.depends_on,
            ResourceSpec::Scaling(s) => &s.depends_on,
        }
    }

    /// Names this resource refers to besides `depends_on`.
    ///
    /// Validation requires each of these to also appear in
    /// `depends_on`, keeping ordering explicit.
    pub fn references(&self) -> Vec<&str> {
        match self {
            ResourceSpec::Service(s) => {
                vec![s.cluster.as_str(), s.image.as_str(), s.load_balancer.as_str()]
            }
            ResourceSpec::Scaling(s) => vec![s.plan.target.service.as_str()],
            _ => Vec::new(),
        }
    }
}
