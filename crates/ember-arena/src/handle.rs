//! Arena handles.
//!
//! An [`ArenaHandle`] records where an allocation lives inside a
//! [`TensorArena`](crate::TensorArena). It carries no borrow, so it can be
//! stored in long-lived records; resolving it always goes back through the
//! arena and its bounds checks.

use std::fmt;

/// Byte range of one allocation within the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct ArenaHandle {
    /// Byte offset from the start of the arena buffer.
    pub(crate) offset: usize,
    /// Length of the allocation in bytes.
    pub(crate) len: usize,
}

impl ArenaHandle {
    pub(crate) fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Byte offset from the start of the arena buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether this is a zero-length allocation.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

impl fmt::Display for ArenaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArenaHandle(off={}, len={})", self.offset, self.len)
    }
}
