//! Error types for tensor materialization.
//!
//! Every failure is fatal for the tensor that raised it; the caller is
//! expected to abort the model load. Nothing here is retried.

use std::error::Error;
use std::fmt;

use crate::element::ElementType;

/// Errors raised while sizing or materializing a single tensor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TensorError {
    /// The raw element type tag is not part of the model schema.
    TypeConversion {
        /// The unrecognized raw tag.
        tag: i8,
    },
    /// The element type is recognized but has no fixed byte width.
    UnsupportedType {
        /// The offending element type.
        element_type: ElementType,
    },
    /// Neither the arena nor the caller's buffer could hold the tensor.
    AllocationFailure {
        /// Tensor name, or `"<None>"` when the descriptor has none.
        tensor_name: String,
        /// Number of bytes requested.
        requested: usize,
        /// Bytes that were available when the request failed.
        available: usize,
    },
    /// A shape dimension is negative.
    InvalidShape {
        /// Position of the offending dimension in the shape.
        index: usize,
        /// The offending value.
        dimension: i32,
    },
    /// Element count times element width does not fit in `usize`.
    SizeOverflow,
    /// The zero-point list is non-empty but shorter than one `i64`.
    MalformedQuantization {
        /// Number of raw zero-point bytes present.
        zero_point_bytes: usize,
    },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeConversion { tag } => write!(f, "unrecognized element type tag {tag}"),
            Self::UnsupportedType { element_type } => write!(
                f,
                "Type {element_type} ({}) is not supported",
                element_type.raw()
            ),
            Self::AllocationFailure {
                tensor_name,
                requested,
                available,
            } => write!(
                f,
                "Couldn't allocate memory for tensor '{tensor_name}', wanted {requested} bytes but only {available} were available"
            ),
            Self::InvalidShape { index, dimension } => {
                write!(f, "shape dimension {index} is negative ({dimension})")
            }
            Self::SizeOverflow => write!(f, "tensor byte size overflows usize"),
            Self::MalformedQuantization { zero_point_bytes } => write!(
                f,
                "zero-point data holds {zero_point_bytes} bytes, need at least 8"
            ),
        }
    }
}

impl Error for TensorError {}
