//! Tensor descriptors as decoded from the model container.

use crate::endian::ByteOrder;
use crate::error::TensorError;
use crate::id::BufferIndex;

/// Quantization arrays exactly as stored on a tensor.
///
/// `zero_point` holds the raw stored bytes of an `i64` list in the model's
/// byte order; it is decoded during materialization, never reinterpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QuantizationDesc<'a> {
    /// Per-tensor or per-channel scales.
    pub scale: &'a [f32],
    /// Raw zero-point bytes, 8 per entry.
    pub zero_point: &'a [u8],
}

impl QuantizationDesc<'_> {
    /// Resolve the per-tensor parameters.
    ///
    /// Returns `Ok(None)` unless both lists are non-empty. Only the first
    /// entry of each list is used; per-channel quantization is not handled.
    pub fn resolve(&self, order: ByteOrder) -> Result<Option<QuantizationParams>, TensorError> {
        let Some(&scale) = self.scale.first() else {
            return Ok(None);
        };
        if self.zero_point.is_empty() {
            return Ok(None);
        }
        let zero_point =
            order
                .read_i64(self.zero_point)
                .ok_or(TensorError::MalformedQuantization {
                    zero_point_bytes: self.zero_point.len(),
                })?;
        Ok(Some(QuantizationParams { scale, zero_point }))
    }
}

/// Per-tensor affine quantization: `real = scale * (q - zero_point)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuantizationParams {
    /// Linear scale.
    pub scale: f32,
    /// Integer offset.
    pub zero_point: i64,
}

impl QuantizationParams {
    /// Map a stored integer value to its real value.
    pub fn dequantize(&self, q: i64) -> f32 {
        self.scale * (q - self.zero_point) as f32
    }
}

/// A pre-parsed tensor entry from the model.
///
/// Borrowed from the model container and valid for one materialization
/// call. The element type is kept as the raw schema tag so that
/// unrecognized tags surface as errors at materialization time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TensorDescriptor<'a> {
    /// Raw element type tag.
    pub element_type: i8,
    /// Dimension sizes, outermost first.
    pub shape: &'a [i32],
    /// Index into the constant buffer table.
    pub buffer: BufferIndex,
    /// Quantization arrays, if the tensor carries any.
    pub quantization: Option<QuantizationDesc<'a>>,
    /// Human-readable name.
    pub name: Option<&'a str>,
    /// Whether the tensor is a mutable variable across invocations.
    pub is_variable: bool,
}

impl<'a> TensorDescriptor<'a> {
    /// Descriptor with the given raw type and shape, no data, no name.
    pub fn new(element_type: i8, shape: &'a [i32]) -> Self {
        Self {
            element_type,
            shape,
            buffer: BufferIndex(0),
            quantization: None,
            name: None,
            is_variable: false,
        }
    }

    /// Set the constant buffer index.
    pub fn with_buffer(mut self, buffer: BufferIndex) -> Self {
        self.buffer = buffer;
        self
    }

    /// Set the name.
    pub fn with_name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    /// Attach quantization arrays.
    pub fn with_quantization(mut self, quantization: QuantizationDesc<'a>) -> Self {
        self.quantization = Some(quantization);
        self
    }

    /// Mark the tensor as a variable.
    pub fn with_variable(mut self, is_variable: bool) -> Self {
        self.is_variable = is_variable;
        self
    }

    /// The name, if present and non-empty.
    pub fn non_empty_name(&self) -> Option<&'a str> {
        self.name.filter(|n| !n.is_empty())
    }
}
