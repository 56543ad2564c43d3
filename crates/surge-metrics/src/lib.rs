//! surge-metrics — observability for the load service.
//!
//! Tracks per-route request counters and the retained ballast size,
//! and renders them in the Prometheus text exposition format.
//!
//! # Architecture
//!
//! ```text
//! RequestStats
//!   ├── record(route) / record_*_error() ← called per HTTP request
//!   └── set_retained_bytes()             ← updated on ballast replacement
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for /metrics endpoint
//! ```

pub mod prometheus;
pub mod stats;

pub use prometheus::render_prometheus;
pub use stats::{RequestStats, Route};
