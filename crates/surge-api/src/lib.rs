//! surge-api — HTTP surface for the load service.
//!
//! Provides axum route handlers for the health probe, the two
//! load-generating endpoints, and Prometheus exposition.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Liveness probe, used by the hosting platform |
//! | GET | `/cpu_intensive?iterations=N` | Burn CPU for N rounds (default 10) |
//! | GET | `/memory_intensive?memory_mb=N` | Retain an N MB ballast (default 100) |
//! | GET | `/metrics` | Prometheus exposition |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use surge_load::{Ballast, LoadLimits};
use surge_metrics::RequestStats;

/// Shared state for API handlers.
///
/// The ballast is the only process-wide mutable state; everything else
/// is counters.
#[derive(Clone)]
pub struct ApiState {
    pub ballast: Arc<Ballast>,
    pub stats: Arc<RequestStats>,
    pub limits: LoadLimits,
}

impl ApiState {
    /// Create fresh state with the given admission limits.
    pub fn new(limits: LoadLimits) -> Self {
        Self {
            ballast: Arc::new(Ballast::new()),
            stats: Arc::new(RequestStats::new()),
            limits,
        }
    }
}

/// Build the complete service router.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(handlers::health_check))
        .route("/cpu_intensive", get(handlers::cpu_intensive))
        .route("/memory_intensive", get(handlers::memory_intensive))
        .route("/metrics", get(handlers::prometheus_metrics))
        .with_state(state)
}
