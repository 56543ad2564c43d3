//! surge-provision — declarative provisioning plans.
//!
//! A plan is a list of typed resource specs (cluster, load balancer,
//! container image, service, scaling plan) with dependencies declared
//! explicitly by name. The plan is parsed from TOML, validated, and
//! topologically ordered; handing the ordered resources to an
//! orchestration platform is out of scope.
//!
//! # Plan file shape
//!
//! ```toml
//! [[resource]]
//! type = "cluster"
//! name = "demo-cluster"
//!
//! [[resource]]
//! type = "service"
//! name = "loadgen"
//! cluster = "demo-cluster"
//! # ...
//! depends_on = ["demo-cluster"]
//! ```

pub mod error;
pub mod plan;
pub mod resources;

pub use error::{PlanError, PlanResult};
pub use plan::ProvisionPlan;
pub use resources::{
    ClusterSpec, ContainerImageSpec, LoadBalancerSpec, ResourceSpec, ScalingSpec, ServiceSpec,
};
