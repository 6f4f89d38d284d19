//! Strongly-typed indices and the [`Dims`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Index of a constant buffer in the model's buffer table.
///
/// Buffer 0 is conventionally the empty sentinel buffer, so tensors without
/// constant data usually point at it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferIndex(pub u32);

impl fmt::Display for BufferIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BufferIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Position of a tensor in the model's descriptor order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TensorIndex(pub u32);

impl fmt::Display for TensorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TensorIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A decoded dimension list.
///
/// Inline up to rank 6, which covers every layout the kernels use.
pub type Dims = SmallVec<[i32; 6]>;
