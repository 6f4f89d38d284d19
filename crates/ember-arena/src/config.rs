//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for a [`TensorArena`](crate::TensorArena).
///
/// Validated at construction; immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Usable capacity in bytes.
    ///
    /// Default: 65_536 (64 KiB). The backing storage is rounded up to a
    /// whole number of 8-byte words, but allocations never go past
    /// `capacity`.
    pub capacity: usize,
}

impl ArenaConfig {
    /// Default capacity: 64 KiB.
    pub const DEFAULT_CAPACITY: usize = 64 * 1024;

    /// Largest alignment the arena can honour, in bytes.
    ///
    /// Equal to the alignment of the backing `u64` words and to the widest
    /// element type (`INT64`, `COMPLEX64`).
    pub const MAX_ALIGNMENT: usize = std::mem::align_of::<u64>();

    /// Create a config for an arena of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Check structural invariants.
    ///
    /// Rejects capacities that cannot be backed by a single allocation.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.capacity > isize::MAX as usize {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "capacity must not exceed isize::MAX bytes (got {})",
                    self.capacity
                ),
            });
        }
        Ok(())
    }

    /// Number of backing `u64` words needed for `capacity` bytes.
    pub fn word_count(&self) -> usize {
        self.capacity.div_ceil(std::mem::size_of::<u64>())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
