//! Ember: arena-backed tensor materialization for heapless model inference.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Ember sub-crates. For most users, adding `ember` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use ember::prelude::*;
//!
//! // Constant buffers as the model container would expose them.
//! let weights: Vec<u8> = [0.5f32, -1.0].iter().flat_map(|v| v.to_le_bytes()).collect();
//! let buffers: Vec<Vec<u8>> = vec![Vec::new(), weights];
//!
//! let input_shape = [1, 2];
//! let weight_shape = [2];
//! let descriptors = [
//!     TensorDescriptor::new(ElementType::Float32.raw(), &input_shape).with_name("input"),
//!     TensorDescriptor::new(ElementType::Float32.raw(), &weight_shape)
//!         .with_name("weights")
//!         .with_buffer(BufferIndex(1)),
//! ];
//!
//! let mut session = LoadSession::new(&ArenaConfig::new(1024), MaterializerConfig::default()).unwrap();
//! let tensors = session.load(&descriptors, &buffers, []).unwrap();
//!
//! let input = tensors.by_name("input").unwrap();
//! assert_eq!(input.allocation_kind(), AllocationKind::ArenaOwned);
//! assert_eq!(input.dims(session.arena()).unwrap().as_slice(), &[1, 2]);
//!
//! let weights = tensors.by_name("weights").unwrap();
//! assert_eq!(weights.allocation_kind(), AllocationKind::ConstantAlias);
//! assert_eq!(weights.bytes, 8);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ember-core` | Element types, descriptors, byte order, errors, collaborator traits |
//! | [`arena`] | `ember-arena` | `TensorArena`, `ArenaConfig`, `ArenaHandle` |
//! | [`tensor`] | `ember-tensor` | `TensorMaterializer`, `RuntimeTensor`, `LoadSession` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types: element types, descriptors, byte order, errors, traits.
pub mod types {
    pub use ember_core::*;
}

/// Arena storage.
pub mod arena {
    pub use ember_arena::*;
}

/// Tensor materialization and load sessions.
pub mod tensor {
    pub use ember_tensor::*;
}

/// Common imports for loading a model.
pub mod prelude {
    pub use ember_arena::{ArenaConfig, ArenaError, ArenaHandle, TensorArena};
    pub use ember_core::{
        BufferIndex, BufferTable, ByteOrder, ElementType, ErrorReporter, QuantizationDesc,
        QuantizationParams, TensorDescriptor, TensorError, TensorIndex,
    };
    pub use ember_tensor::{
        AllocationKind, LoadError, LoadSession, MaterializerConfig, RuntimeTensor, TensorData,
        TensorMaterializer, TensorTable,
    };
}
