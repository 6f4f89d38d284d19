//! Core types and traits for the Ember tensor materializer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared across the Ember workspace: element types and
//! their byte widths, tensor descriptors as handed over by the model
//! container, byte-order decoding, error types, and the collaborator
//! traits for constant buffers and diagnostics.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod descriptor;
pub mod element;
pub mod endian;
pub mod error;
pub mod id;
pub mod size;
pub mod traits;

pub use descriptor::{QuantizationDesc, QuantizationParams, TensorDescriptor};
pub use element::ElementType;
pub use endian::ByteOrder;
pub use error::TensorError;
pub use id::{BufferIndex, Dims, TensorIndex};
pub use size::{bytes_required, shape_element_count};
pub use traits::{BufferTable, ErrorReporter};
