//! The runtime tensor record produced by materialization.

use std::fmt;

use ember_arena::{ArenaHandle, TensorArena};
use ember_core::{Dims, ElementType, QuantizationParams};

use crate::dims::DimsHandle;

/// Name given to tensors whose descriptor has no (or an empty) name.
pub const NO_NAME: &str = "<No name>";

/// Where a tensor's bytes live and who owns them.
///
/// The lifetime `'m` covers data borrowed from outside the arena: the
/// model's constant buffers and caller-preallocated buffers.
#[derive(Debug, PartialEq, Eq)]
pub enum TensorData<'m> {
    /// Read-only borrow of constant data embedded in the model image.
    ConstantAlias(&'m [u8]),
    /// Mutable region carved out of the load session's arena.
    ArenaOwned(ArenaHandle),
    /// Mutable buffer supplied by the caller for this tensor.
    Preallocated(&'m mut [u8]),
}

impl TensorData<'_> {
    /// The ownership classification without the payload.
    pub fn kind(&self) -> AllocationKind {
        match self {
            Self::ConstantAlias(_) => AllocationKind::ConstantAlias,
            Self::ArenaOwned(_) => AllocationKind::ArenaOwned,
            Self::Preallocated(_) => AllocationKind::Preallocated,
        }
    }
}

/// Ownership classification of a [`RuntimeTensor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AllocationKind {
    /// Aliases immutable model data.
    ConstantAlias,
    /// Owned by the arena, mutable.
    ArenaOwned,
    /// Caller-supplied, mutable.
    Preallocated,
}

impl AllocationKind {
    /// Whether kernels may write to the tensor's data.
    pub fn is_mutable(self) -> bool {
        !matches!(self, Self::ConstantAlias)
    }
}

impl fmt::Display for AllocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConstantAlias => write!(f, "constant"),
            Self::ArenaOwned => write!(f, "arena"),
            Self::Preallocated => write!(f, "preallocated"),
        }
    }
}

/// Opaque handle to an accelerator delegate, set by later pipeline stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DelegateHandle(pub u32);

/// Delegate-side buffer handle. Zero means "no buffer".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub i32);

/// A materialized tensor, ready for the execution graph.
///
/// Created once per descriptor and never touched by the materializer
/// again. `delegate`, `buffer_handle` and `data_is_stale` start neutral and
/// belong to later pipeline stages.
#[derive(Debug, PartialEq)]
pub struct RuntimeTensor<'m> {
    /// Element type.
    pub element_type: ElementType,
    /// Length of the tensor data in bytes.
    pub bytes: usize,
    /// Data location and ownership.
    pub data: TensorData<'m>,
    /// Dimension list stored in the arena.
    pub dims: DimsHandle,
    /// Per-tensor quantization, if the descriptor carried any.
    pub quantization: Option<QuantizationParams>,
    /// Tensor name, or [`NO_NAME`].
    pub name: &'m str,
    /// Whether the tensor is a variable across invocations.
    pub is_variable: bool,
    /// Delegate owning this tensor, if any.
    pub delegate: Option<DelegateHandle>,
    /// Delegate buffer handle.
    pub buffer_handle: BufferHandle,
    /// Whether the data must be synced from the delegate before reading.
    pub data_is_stale: bool,
}

impl RuntimeTensor<'_> {
    /// Ownership classification.
    pub fn allocation_kind(&self) -> AllocationKind {
        self.data.kind()
    }

    /// Number of elements, derived from the byte length.
    ///
    /// For constant tensors this follows the data, not the declared shape.
    pub fn element_count(&self) -> usize {
        match self.element_type.size_of() {
            Ok(size) => self.bytes / size,
            Err(_) => 0,
        }
    }

    /// Whether the descriptor supplied a name.
    pub fn has_name(&self) -> bool {
        self.name != NO_NAME
    }

    /// The tensor's bytes.
    ///
    /// `arena` must be the arena the tensor was materialized into; a handle
    /// that does not resolve against it yields `None`.
    pub fn data<'s>(&'s self, arena: &'s TensorArena) -> Option<&'s [u8]> {
        match &self.data {
            TensorData::ConstantAlias(buf) => buf.get(..self.bytes),
            TensorData::ArenaOwned(handle) => arena.bytes(*handle).ok(),
            TensorData::Preallocated(buf) => buf.get(..self.bytes),
        }
    }

    /// Mutable access to the tensor's bytes.
    ///
    /// Returns `None` for constant tensors, which are read-only.
    pub fn data_mut<'s>(&'s mut self, arena: &'s mut TensorArena) -> Option<&'s mut [u8]> {
        let bytes = self.bytes;
        match &mut self.data {
            TensorData::ConstantAlias(_) => None,
            TensorData::ArenaOwned(handle) => arena.bytes_mut(*handle).ok(),
            TensorData::Preallocated(buf) => buf.get_mut(..bytes),
        }
    }

    /// Decode the dimension list from the arena.
    pub fn dims(&self, arena: &TensorArena) -> Option<Dims> {
        self.dims.read(arena)
    }
}
