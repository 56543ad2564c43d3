//! surge-load — synthetic load primitives.
//!
//! Provides the two pressure generators the HTTP surface exposes:
//! a fixed-cost CPU burn loop and a process-wide memory ballast that
//! retains its most recent allocation until replaced. Admission limits
//! bound how much of either a single request may ask for.
//!
//! # Architecture
//!
//! ```text
//! cpu_burn(iterations) → CpuBurnReport   (pure, terminates for all inputs)
//!
//! Ballast
//!   ├── replace(memory_mb) → retained byte count (last writer wins)
//!   └── retained_bytes()   → current ballast size
//!
//! LoadLimits
//!   ├── admit_cpu(iterations)
//!   └── admit_memory(memory_mb)
//! ```

pub mod ballast;
pub mod burn;
pub mod error;
pub mod limits;

pub use ballast::{BYTES_PER_MB, Ballast};
pub use burn::{CpuBurnReport, cpu_burn};
pub use error::{LoadError, LoadResult};
pub use limits::LoadLimits;
