//! Dimension lists stored in the arena.
//!
//! A dimension list is `rank + 1` native-endian `i32` values: the rank
//! followed by each dimension, outermost first. It is allocated from the
//! same arena as tensor data, aligned to `i32`.

use ember_arena::{ArenaError, ArenaHandle, TensorArena};
use ember_core::Dims;

const INT_SIZE: usize = std::mem::size_of::<i32>();

/// Location of a tensor's dimension list within the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DimsHandle {
    handle: ArenaHandle,
}

impl DimsHandle {
    /// Bytes needed for a dimension list of the given rank.
    ///
    /// Returns `None` on overflow.
    pub fn bytes_for_rank(rank: usize) -> Option<usize> {
        rank.checked_add(1)?.checked_mul(INT_SIZE)
    }

    /// Allocate and populate a dimension list for `shape`.
    ///
    /// The caller guarantees `shape.len()` fits in an `i32`.
    pub fn allocate(arena: &mut TensorArena, shape: &[i32]) -> Result<Self, ArenaError> {
        let size = Self::bytes_for_rank(shape.len()).ok_or(ArenaError::OutOfMemory {
            requested: usize::MAX,
            available: arena.remaining(),
        })?;
        let handle = arena.allocate(size, std::mem::align_of::<i32>())?;
        let rank = shape.len() as i32;
        let bytes = arena.bytes_mut(handle)?;
        for (slot, value) in bytes
            .chunks_exact_mut(INT_SIZE)
            .zip(std::iter::once(rank).chain(shape.iter().copied()))
        {
            slot.copy_from_slice(&value.to_ne_bytes());
        }
        Ok(Self { handle })
    }

    /// Decode the stored dimensions.
    ///
    /// Returns `None` if the handle does not resolve against `arena` or the
    /// stored rank is inconsistent with the record length.
    pub fn read(&self, arena: &TensorArena) -> Option<Dims> {
        let bytes = arena.bytes(self.handle).ok()?;
        let mut values = bytes
            .chunks_exact(INT_SIZE)
            .map(|chunk| i32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        let rank = usize::try_from(values.next()?).ok()?;
        let dims: Dims = values.collect();
        (dims.len() == rank).then_some(dims)
    }

    /// The underlying arena handle.
    pub fn handle(&self) -> ArenaHandle {
        self.handle
    }
}
