//! Benchmark profiles and utilities for Ember.
//!
//! Provides pre-built [`ModelFixture`] profiles for benchmarking:
//!
//! - [`reference_model`]: a small quantized conv block, ~10 tensors
//! - [`wide_model`]: many small activations, stresses per-tensor overhead

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ember_core::{ByteOrder, ElementType};
use ember_test_utils::{ModelFixture, TensorSpec};

/// A conv block: int8 input, constant weights and bias, int8 activations.
///
/// Constant data stays in the model; activations and dimension lists need
/// a little over 4 KiB of arena.
pub fn reference_model() -> ModelFixture {
    let mut model = ModelFixture::new();
    let q = |ty: ElementType, shape: &[i32]| {
        TensorSpec::new(ty, shape).quantized(0.05, -128, ByteOrder::Little)
    };

    model.push("input", q(ElementType::Int8, &[1, 16, 16, 8]));
    let weights = model.add_buffer(vec![1; 3 * 3 * 8 * 8]);
    model.push(
        "conv/weights",
        q(ElementType::Int8, &[8, 3, 3, 8]).constant(weights),
    );
    let bias = model.add_buffer(vec![0; 8 * 4]);
    model.push("conv/bias", TensorSpec::new(ElementType::Int32, &[8]).constant(bias));
    model.push("conv/out", q(ElementType::Int8, &[1, 14, 14, 8]));
    model.push("pool/out", q(ElementType::Int8, &[1, 7, 7, 8]));
    model.push("flatten/shape", TensorSpec::new(ElementType::Int32, &[2]));
    model.push("logits", q(ElementType::Int8, &[1, 10]));
    model.push("probs", TensorSpec::new(ElementType::Float32, &[1, 10]));
    model
}

/// `count` small float32 activations of shape `[1, 4]`.
pub fn wide_model(count: usize) -> ModelFixture {
    let mut model = ModelFixture::new();
    for i in 0..count {
        model.push(&format!("act{i}"), TensorSpec::new(ElementType::Float32, &[1, 4]));
    }
    model
}
