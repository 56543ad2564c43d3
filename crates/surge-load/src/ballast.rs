//! Memory ballast — the retained allocation.
//!
//! The ballast holds at most one block at a time. Replacing it drops
//! the previous block, so resident memory tracks the most recent
//! request rather than growing across calls. Concurrent replacements
//! race with last-writer-wins semantics; the ordering is unspecified.

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::error::{LoadError, LoadResult};

/// Bytes per megabyte.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// The retained block. Zeroed on allocation so every page is resident.
struct BallastBlock {
    bytes: Vec<u8>,
}

impl BallastBlock {
    fn allocate(size: u64) -> LoadResult<Self> {
        let len = usize::try_from(size).map_err(|_| LoadError::Allocation { bytes: size })?;

        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| LoadError::Allocation { bytes: size })?;
        // Zeroing writes every page, which keeps the block resident
        // rather than merely reserved.
        bytes.resize(len, 0);

        Ok(Self { bytes })
    }
}

/// Process-wide owned container for the retained allocation.
///
/// Exclusive-write access goes through [`Ballast::replace`]; there is
/// no way to mutate the block in place.
pub struct Ballast {
    block: Mutex<Option<BallastBlock>>,
}

impl Ballast {
    /// Create an empty ballast.
    pub fn new() -> Self {
        Self {
            block: Mutex::new(None),
        }
    }

    /// Allocate `memory_mb` megabytes and retain the block, dropping
    /// whatever was retained before. Returns the retained byte count.
    ///
    /// On allocation failure the previous block stays in place.
    pub fn replace(&self, memory_mb: u64) -> LoadResult<u64> {
        let size = memory_mb
            .checked_mul(BYTES_PER_MB)
            .ok_or(LoadError::Allocation { bytes: u64::MAX })?;

        let block = BallastBlock::allocate(size)?;

        let mut guard = self.lock();
        let previous = guard.replace(block);
        drop(guard);

        if let Some(old) = previous {
            debug!(
                dropped_bytes = old.bytes.len(),
                retained_bytes = size,
                "ballast replaced"
            );
        }

        Ok(size)
    }

    /// Size of the currently retained block, zero if none.
    pub fn retained_bytes(&self) -> u64 {
        self.lock().as_ref().map_or(0, |b| b.bytes.len() as u64)
    }

    fn lock(&self) -> MutexGuard<'_, Option<BallastBlock>> {
        // A poisoned lock only means a panic happened mid-replace; the
        // Option inside is still coherent.
        match self.block.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for Ballast {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ballast_retains_nothing() {
        let ballast = Ballast::new();
        assert_eq!(ballast.retained_bytes(), 0);
    }

    #[test]
    fn replace_retains_requested_size() {
        let ballast = Ballast::new();
        let bytes = ballast.replace(2).unwrap();
        assert_eq!(bytes, 2 * BYTES_PER_MB);
        assert_eq!(ballast.retained_bytes(), 2 * BYTES_PER_MB);
    }

    #[test]
    fn replace_drops_previous_block() {
        let ballast = Ballast::new();
        ballast.replace(8).unwrap();
        ballast.replace(1).unwrap();
        // Only the most recent allocation is kept alive.
        assert_eq!(ballast.retained_bytes(), BYTES_PER_MB);
    }

    #[test]
    fn zero_mb_retains_empty_block() {
        let ballast = Ballast::new();
        let bytes = ballast.replace(0).unwrap();
        assert_eq!(bytes, 0);
        assert_eq!(ballast.retained_bytes(), 0);
    }

    #[test]
    fn overflowing_request_fails_without_touching_block() {
        let ballast = Ballast::new();
        ballast.replace(1).unwrap();

        let result = ballast.replace(u64::MAX);
        assert!(matches!(result, Err(LoadError::Allocation { .. })));
        assert_eq!(ballast.retained_bytes(), BYTES_PER_MB);
    }
}
