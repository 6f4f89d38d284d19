//! In-memory model fixtures.
//!
//! [`ModelFixture`] plays the part of the model container: it owns tensor
//! metadata and constant buffers and hands out borrowed descriptors in
//! insertion order.

use indexmap::IndexMap;

use ember_core::{
    BufferIndex, ByteOrder, ElementType, QuantizationDesc, TensorDescriptor, TensorIndex,
};

/// Owned description of one fixture tensor.
#[derive(Clone, Debug, PartialEq)]
pub struct TensorSpec {
    pub element_type: i8,
    pub shape: Vec<i32>,
    pub buffer: BufferIndex,
    pub scale: Vec<f32>,
    pub zero_point: Vec<u8>,
    pub is_variable: bool,
    pub named: bool,
}

impl TensorSpec {
    pub fn new(element_type: ElementType, shape: &[i32]) -> Self {
        Self::raw(element_type.raw(), shape)
    }

    /// Tensor with an arbitrary raw type tag, including invalid ones.
    pub fn raw(element_type: i8, shape: &[i32]) -> Self {
        Self {
            element_type,
            shape: shape.to_vec(),
            buffer: BufferIndex(0),
            scale: Vec::new(),
            zero_point: Vec::new(),
            is_variable: false,
            named: true,
        }
    }

    pub fn constant(mut self, buffer: BufferIndex) -> Self {
        self.buffer = buffer;
        self
    }

    /// Attach per-tensor quantization, storing the zero-point in `order`.
    pub fn quantized(mut self, scale: f32, zero_point: i64, order: ByteOrder) -> Self {
        self.scale = vec![scale];
        self.zero_point = order.write_i64(zero_point).to_vec();
        self
    }

    pub fn variable(mut self) -> Self {
        self.is_variable = true;
        self
    }

    /// Drop the name from the generated descriptor.
    pub fn unnamed(mut self) -> Self {
        self.named = false;
        self
    }
}

/// An in-memory stand-in for a parsed model.
///
/// Buffer 0 is always the empty sentinel buffer.
#[derive(Clone, Debug)]
pub struct ModelFixture {
    tensors: IndexMap<String, TensorSpec>,
    buffers: Vec<Vec<u8>>,
}

impl ModelFixture {
    pub fn new() -> Self {
        Self {
            tensors: IndexMap::new(),
            buffers: vec![Vec::new()],
        }
    }

    /// Append a constant buffer and return its index.
    pub fn add_buffer(&mut self, bytes: Vec<u8>) -> BufferIndex {
        self.buffers.push(bytes);
        BufferIndex((self.buffers.len() - 1) as u32)
    }

    /// Append a tensor. Names must be unique within the fixture.
    ///
    /// # Panics
    ///
    /// Panics on a duplicate name.
    pub fn push(&mut self, name: &str, spec: TensorSpec) -> TensorIndex {
        assert!(
            !self.tensors.contains_key(name),
            "duplicate tensor name '{name}' in fixture"
        );
        let index = TensorIndex(self.tensors.len() as u32);
        self.tensors.insert(name.to_string(), spec);
        index
    }

    /// Append a float32 constant tensor whose data is `values`, stored
    /// little-endian.
    pub fn push_f32_constant(&mut self, name: &str, shape: &[i32], values: &[f32]) -> TensorIndex {
        let bytes = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let buffer = self.add_buffer(bytes);
        self.push(name, TensorSpec::new(ElementType::Float32, shape).constant(buffer))
    }

    /// Descriptors for every tensor, in insertion order.
    pub fn descriptors(&self) -> Vec<TensorDescriptor<'_>> {
        self.tensors
            .iter()
            .map(|(name, spec)| TensorDescriptor {
                element_type: spec.element_type,
                shape: &spec.shape,
                buffer: spec.buffer,
                quantization: (!spec.scale.is_empty() || !spec.zero_point.is_empty()).then(
                    || QuantizationDesc {
                        scale: &spec.scale,
                        zero_point: &spec.zero_point,
                    },
                ),
                name: spec.named.then_some(name.as_str()),
                is_variable: spec.is_variable,
            })
            .collect()
    }

    /// The constant buffer table.
    pub fn buffers(&self) -> &[Vec<u8>] {
        &self.buffers
    }

    /// Position of the tensor registered as `name`.
    pub fn index_of(&self, name: &str) -> Option<TensorIndex> {
        self.tensors
            .get_index_of(name)
            .map(|i| TensorIndex(i as u32))
    }

    pub fn tensor_count(&self) -> usize {
        self.tensors.len()
    }
}

impl Default for ModelFixture {
    fn default() -> Self {
        Self::new()
    }
}
