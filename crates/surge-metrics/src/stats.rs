//! Request counters.
//!
//! Lock-free: every counter is an `AtomicU64` with relaxed ordering.
//! Counts are monotonic for the life of the process; the ballast gauge
//! follows the most recent replacement.

use std::sync::atomic::{AtomicU64, Ordering};

/// The routes the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Health,
    CpuIntensive,
    MemoryIntensive,
}

impl Route {
    /// Label value used in the Prometheus exposition.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Health => "health",
            Route::CpuIntensive => "cpu_intensive",
            Route::MemoryIntensive => "memory_intensive",
        }
    }
}

/// Process-wide request statistics.
#[derive(Debug, Default)]
pub struct RequestStats {
    health_requests: AtomicU64,
    cpu_requests: AtomicU64,
    memory_requests: AtomicU64,
    client_errors: AtomicU64,
    server_errors: AtomicU64,
    /// Total CPU burn iterations served.
    cpu_iterations: AtomicU64,
    /// Size of the currently retained ballast block.
    retained_bytes: AtomicU64,
}

impl RequestStats {
    /// Create a zeroed stats block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully served request.
    pub fn record(&self, route: Route) {
        let counter = match route {
            Route::Health => &self.health_requests,
            Route::CpuIntensive => &self.cpu_requests,
            Route::MemoryIntensive => &self.memory_requests,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record iterations served by a completed CPU burn.
    pub fn add_cpu_iterations(&self, iterations: u64) {
        self.cpu_iterations.fetch_add(iterations, Ordering::Relaxed);
    }

    /// Record a request rejected with a client error.
    pub fn record_client_error(&self) {
        self.client_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a request failed with a server error.
    pub fn record_server_error(&self) {
        self.server_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Update the ballast gauge after a replacement.
    pub fn set_retained_bytes(&self, bytes: u64) {
        self.retained_bytes.store(bytes, Ordering::Relaxed);
    }

    pub fn requests(&self, route: Route) -> u64 {
        match route {
            Route::Health => self.health_requests.load(Ordering::Relaxed),
            Route::CpuIntensive => self.cpu_requests.load(Ordering::Relaxed),
            Route::MemoryIntensive => self.memory_requests.load(Ordering::Relaxed),
        }
    }

    pub fn client_errors(&self) -> u64 {
        self.client_errors.load(Ordering::Relaxed)
    }

    pub fn server_errors(&self) -> u64 {
        self.server_errors.load(Ordering::Relaxed)
    }

    pub fn cpu_iterations(&self) -> u64 {
        self.cpu_iterations.load(Ordering::Relaxed)
    }

    pub fn retained_bytes(&self) -> u64 {
        self.retained_bytes.load(Ordering::Relaxed)
    }
}
