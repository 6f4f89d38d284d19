//! Tensor materialization: descriptor in, runtime tensor out.
//!
//! [`TensorMaterializer::materialize`] classifies each tensor as a constant
//! alias into model data, a caller-preallocated buffer, or a fresh arena
//! region, and fills in the rest of the [`RuntimeTensor`] record.
//!
//! All type, shape and quantization validation runs before the arena is
//! touched, so a tensor rejected for those reasons leaves the arena
//! unchanged.

use ember_arena::{ArenaError, TensorArena};
use ember_core::{
    bytes_required, shape_element_count, BufferTable, ByteOrder, ElementType, ErrorReporter,
    QuantizationParams, TensorDescriptor, TensorError,
};

use crate::dims::DimsHandle;
use crate::reporter::TracingReporter;
use crate::runtime::{BufferHandle, RuntimeTensor, TensorData, NO_NAME};

/// Name used in allocation diagnostics for tensors without a name.
pub const UNNAMED_IN_DIAGNOSTICS: &str = "<None>";

/// Materialization settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterializerConfig {
    /// Byte order of multi-byte values stored in the model, such as
    /// quantization zero-points. Default: little-endian.
    pub byte_order: ByteOrder,
}

/// Turns tensor descriptors into [`RuntimeTensor`]s.
///
/// Holds the configuration and the diagnostic sink. Every error is both
/// reported and returned.
pub struct TensorMaterializer<R: ErrorReporter = TracingReporter> {
    config: MaterializerConfig,
    reporter: R,
}

impl TensorMaterializer<TracingReporter> {
    /// Materializer reporting through `tracing`.
    pub fn new(config: MaterializerConfig) -> Self {
        Self::with_reporter(config, TracingReporter)
    }
}

impl<R: ErrorReporter> TensorMaterializer<R> {
    /// Materializer reporting through `reporter`.
    pub fn with_reporter(config: MaterializerConfig, reporter: R) -> Self {
        Self { config, reporter }
    }

    /// The active configuration.
    pub fn config(&self) -> &MaterializerConfig {
        &self.config
    }

    /// The diagnostic sink.
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Consume the materializer, returning its reporter.
    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Materialize one tensor.
    ///
    /// A non-empty constant buffer at the descriptor's buffer index makes
    /// the tensor a read-only alias of that buffer; its byte length follows
    /// the buffer, not the shape. Otherwise the tensor is mutable and uses
    /// `preallocated` if given, or a fresh region from `arena` aligned to
    /// the element width. The dimension list always comes from `arena`.
    ///
    /// On failure the arena may have consumed space for this tensor's data
    /// (but never for type or shape errors); the load is expected to be
    /// abandoned.
    pub fn materialize<'m, B>(
        &mut self,
        descriptor: &TensorDescriptor<'m>,
        arena: &mut TensorArena,
        preallocated: Option<&'m mut [u8]>,
        buffers: &'m B,
    ) -> Result<RuntimeTensor<'m>, TensorError>
    where
        B: BufferTable + ?Sized,
    {
        let result = self.try_materialize(descriptor, arena, preallocated, buffers);
        if let Err(e) = &result {
            self.reporter.report(&e.to_string());
        }
        result
    }

    fn try_materialize<'m, B>(
        &self,
        descriptor: &TensorDescriptor<'m>,
        arena: &mut TensorArena,
        preallocated: Option<&'m mut [u8]>,
        buffers: &'m B,
    ) -> Result<RuntimeTensor<'m>, TensorError>
    where
        B: BufferTable + ?Sized,
    {
        let element_type = ElementType::from_raw(descriptor.element_type)?;
        let element_size = element_type.size_of()?;
        check_shape(descriptor.shape)?;
        let quantization = self.resolve_quantization(descriptor)?;

        let constant = buffers
            .buffer(descriptor.buffer)
            .filter(|data| !data.is_empty());

        let (data, bytes) = match constant {
            Some(model_data) => {
                let (bytes, _) = bytes_required(element_type, model_data.len() / element_size)?;
                (TensorData::ConstantAlias(model_data), bytes)
            }
            None => {
                let count = shape_element_count(descriptor.shape)?;
                let (bytes, element_size) = bytes_required(element_type, count)?;
                let data = match preallocated {
                    Some(buf) if buf.len() >= bytes => TensorData::Preallocated(buf),
                    Some(buf) => {
                        return Err(TensorError::AllocationFailure {
                            tensor_name: diagnostic_name(descriptor),
                            requested: bytes,
                            available: buf.len(),
                        })
                    }
                    None => {
                        let handle = arena
                            .allocate(bytes, element_size)
                            .map_err(|e| allocation_failure(descriptor, e, bytes, arena))?;
                        TensorData::ArenaOwned(handle)
                    }
                };
                (data, bytes)
            }
        };

        let dims = DimsHandle::allocate(arena, descriptor.shape).map_err(|e| {
            let requested = DimsHandle::bytes_for_rank(descriptor.shape.len()).unwrap_or(usize::MAX);
            allocation_failure(descriptor, e, requested, arena)
        })?;

        let tensor = RuntimeTensor {
            element_type,
            bytes,
            data,
            dims,
            quantization,
            name: descriptor.non_empty_name().unwrap_or(NO_NAME),
            is_variable: descriptor.is_variable,
            delegate: None,
            buffer_handle: BufferHandle::default(),
            data_is_stale: false,
        };

        tracing::debug!(
            tensor = tensor.name,
            kind = %tensor.allocation_kind(),
            element_type = %element_type,
            bytes,
            arena_used = arena.used(),
            arena_capacity = arena.capacity(),
            "materialized tensor"
        );
        Ok(tensor)
    }

    fn resolve_quantization(
        &self,
        descriptor: &TensorDescriptor<'_>,
    ) -> Result<Option<QuantizationParams>, TensorError> {
        match &descriptor.quantization {
            Some(q) => q.resolve(self.config.byte_order),
            None => Ok(None),
        }
    }
}

/// Reject negative dimensions and ranks that do not fit the `i32` rank slot.
fn check_shape(shape: &[i32]) -> Result<(), TensorError> {
    if i32::try_from(shape.len()).is_err() {
        return Err(TensorError::SizeOverflow);
    }
    match shape.iter().position(|&d| d < 0) {
        Some(index) => Err(TensorError::InvalidShape {
            index,
            dimension: shape[index],
        }),
        None => Ok(()),
    }
}

fn diagnostic_name(descriptor: &TensorDescriptor<'_>) -> String {
    descriptor
        .non_empty_name()
        .unwrap_or(UNNAMED_IN_DIAGNOSTICS)
        .to_string()
}

fn allocation_failure(
    descriptor: &TensorDescriptor<'_>,
    error: ArenaError,
    requested: usize,
    arena: &TensorArena,
) -> TensorError {
    let available = match error {
        ArenaError::OutOfMemory { available, .. } => available,
        _ => arena.remaining(),
    };
    TensorError::AllocationFailure {
        tensor_name: diagnostic_name(descriptor),
        requested,
        available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::AllocationKind;
    use ember_arena::ArenaConfig;
    use ember_core::{BufferIndex, QuantizationDesc};

    #[derive(Default)]
    struct Collect(Vec<String>);

    impl ErrorReporter for Collect {
        fn report(&mut self, message: &str) {
            self.0.push(message.to_string());
        }
    }

    fn arena(capacity: usize) -> TensorArena {
        TensorArena::new(&ArenaConfig::new(capacity)).unwrap()
    }

    fn materializer() -> TensorMaterializer<Collect> {
        TensorMaterializer::with_reporter(MaterializerConfig::default(), Collect::default())
    }

    const NO_BUFFERS: &[&[u8]] = &[&[]];

    #[test]
    fn mutable_tensor_comes_from_arena() {
        let mut arena = arena(256);
        let shape = [2, 3];
        let desc = TensorDescriptor::new(ElementType::Float32.raw(), &shape).with_name("act");
        let t = materializer()
            .materialize(&desc, &mut arena, None, NO_BUFFERS)
            .unwrap();
        assert_eq!(t.allocation_kind(), AllocationKind::ArenaOwned);
        assert_eq!(t.bytes, 24);
        assert_eq!(t.name, "act");
        assert_eq!(t.dims(&arena).unwrap().as_slice(), &[2, 3]);
        // 24 data bytes + 3 ints of dims.
        assert_eq!(arena.used(), 36);
    }

    #[test]
    fn constant_tensor_aliases_model_data() {
        let mut arena = arena(64);
        let weights: Vec<u8> = (0..16).collect();
        let buffers: Vec<&[u8]> = vec![&[], &weights];
        let shape = [4];
        let desc = TensorDescriptor::new(ElementType::Int32.raw(), &shape)
            .with_buffer(BufferIndex(1));
        let t = materializer()
            .materialize(&desc, &mut arena, None, buffers.as_slice())
            .unwrap();
        assert_eq!(t.allocation_kind(), AllocationKind::ConstantAlias);
        assert_eq!(t.bytes, 16);
        assert_eq!(t.data(&arena).unwrap().as_ptr(), weights.as_ptr());
        // Only the dims list was allocated.
        assert_eq!(arena.used(), 8);
    }

    #[test]
    fn constant_length_follows_data_not_shape() {
        let mut arena = arena(64);
        let weights = [0u8; 12];
        let buffers: [&[u8]; 2] = [&[], &weights];
        let shape = [10];
        let desc = TensorDescriptor::new(ElementType::Float32.raw(), &shape)
            .with_buffer(BufferIndex(1));
        let t = materializer()
            .materialize(&desc, &mut arena, None, &buffers[..])
            .unwrap();
        assert_eq!(t.bytes, 12);
        assert_eq!(t.element_count(), 3);
        assert_eq!(t.dims(&arena).unwrap().as_slice(), &[10]);
    }

    #[test]
    fn empty_constant_buffer_means_mutable() {
        let mut arena = arena(64);
        let buffers: [&[u8]; 2] = [&[], &[]];
        let shape = [2];
        let desc = TensorDescriptor::new(ElementType::Int8.raw(), &shape)
            .with_buffer(BufferIndex(1));
        let t = materializer()
            .materialize(&desc, &mut arena, None, &buffers[..])
            .unwrap();
        assert_eq!(t.allocation_kind(), AllocationKind::ArenaOwned);
    }

    #[test]
    fn out_of_range_buffer_index_means_mutable() {
        let mut arena = arena(64);
        let shape = [2];
        let desc = TensorDescriptor::new(ElementType::Int8.raw(), &shape)
            .with_buffer(BufferIndex(7));
        let t = materializer()
            .materialize(&desc, &mut arena, None, NO_BUFFERS)
            .unwrap();
        assert_eq!(t.allocation_kind(), AllocationKind::ArenaOwned);
    }

    #[test]
    fn preallocated_buffer_bypasses_arena_data() {
        let mut arena = arena(64);
        let mut scratch = [0u8; 32];
        let scratch_ptr = scratch.as_ptr();
        let shape = [4, 2];
        let desc = TensorDescriptor::new(ElementType::Int16.raw(), &shape);
        let t = materializer()
            .materialize(&desc, &mut arena, Some(&mut scratch), NO_BUFFERS)
            .unwrap();
        assert_eq!(t.allocation_kind(), AllocationKind::Preallocated);
        assert_eq!(t.bytes, 16);
        assert_eq!(t.data(&arena).unwrap().as_ptr(), scratch_ptr);
        assert_eq!(arena.used(), 12);
    }

    #[test]
    fn short_preallocated_buffer_is_allocation_failure() {
        let mut arena = arena(64);
        let mut scratch = [0u8; 3];
        let shape = [4];
        let desc = TensorDescriptor::new(ElementType::Int8.raw(), &shape);
        let mut m = materializer();
        let err = m
            .materialize(&desc, &mut arena, Some(&mut scratch), NO_BUFFERS)
            .unwrap_err();
        assert_eq!(
            err,
            TensorError::AllocationFailure {
                tensor_name: "<None>".into(),
                requested: 4,
                available: 3,
            }
        );
        assert_eq!(m.reporter().0.len(), 1);
    }

    #[test]
    fn arena_exhaustion_reports_name_and_sizes() {
        let mut arena = arena(16);
        arena.allocate(10, 1).unwrap();
        let shape = [2];
        let desc = TensorDescriptor::new(ElementType::Float32.raw(), &shape).with_name("big");
        let mut m = materializer();
        let err = m
            .materialize(&desc, &mut arena, None, NO_BUFFERS)
            .unwrap_err();
        assert_eq!(
            err,
            TensorError::AllocationFailure {
                tensor_name: "big".into(),
                requested: 8,
                available: 6,
            }
        );
        assert_eq!(
            m.reporter().0,
            vec!["Couldn't allocate memory for tensor 'big', wanted 8 bytes but only 6 were available".to_string()]
        );
        assert_eq!(arena.used(), 10);
    }

    #[test]
    fn dims_exhaustion_is_allocation_failure() {
        let mut arena = arena(8);
        let shape = [2];
        let desc = TensorDescriptor::new(ElementType::Float32.raw(), &shape);
        let err = materializer()
            .materialize(&desc, &mut arena, None, NO_BUFFERS)
            .unwrap_err();
        assert_eq!(
            err,
            TensorError::AllocationFailure {
                tensor_name: "<None>".into(),
                requested: 8,
                available: 0,
            }
        );
    }

    #[test]
    fn unsupported_type_leaves_arena_untouched() {
        let mut arena = arena(64);
        let shape = [3];
        let desc = TensorDescriptor::new(ElementType::String.raw(), &shape);
        let mut m = materializer();
        let err = m
            .materialize(&desc, &mut arena, None, NO_BUFFERS)
            .unwrap_err();
        assert_eq!(
            err,
            TensorError::UnsupportedType {
                element_type: ElementType::String
            }
        );
        assert_eq!(arena.used(), 0);
        assert_eq!(m.reporter().0, vec!["Type STRING (5) is not supported".to_string()]);
    }

    #[test]
    fn unknown_tag_is_conversion_error() {
        let mut arena = arena(64);
        let desc = TensorDescriptor::new(100, &[]);
        let err = materializer()
            .materialize(&desc, &mut arena, None, NO_BUFFERS)
            .unwrap_err();
        assert_eq!(err, TensorError::TypeConversion { tag: 100 });
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn negative_dimension_leaves_arena_untouched() {
        let mut arena = arena(64);
        let shape = [2, -4];
        let desc = TensorDescriptor::new(ElementType::Int8.raw(), &shape);
        let err = materializer()
            .materialize(&desc, &mut arena, None, NO_BUFFERS)
            .unwrap_err();
        assert_eq!(
            err,
            TensorError::InvalidShape {
                index: 1,
                dimension: -4
            }
        );
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn quantization_decoded_in_declared_byte_order() {
        let zp = ByteOrder::Big.write_i64(-3);
        let shape = [1];
        let desc = TensorDescriptor::new(ElementType::UInt8.raw(), &shape).with_quantization(
            QuantizationDesc {
                scale: &[0.5],
                zero_point: &zp,
            },
        );
        let mut arena = arena(64);
        let config = MaterializerConfig {
            byte_order: ByteOrder::Big,
        };
        let t = TensorMaterializer::with_reporter(config, Collect::default())
            .materialize(&desc, &mut arena, None, NO_BUFFERS)
            .unwrap();
        assert_eq!(
            t.quantization,
            Some(QuantizationParams {
                scale: 0.5,
                zero_point: -3
            })
        );
    }

    #[test]
    fn malformed_zero_point_leaves_arena_untouched() {
        let shape = [1];
        let desc = TensorDescriptor::new(ElementType::Int8.raw(), &shape).with_quantization(
            QuantizationDesc {
                scale: &[0.5],
                zero_point: &[1, 2],
            },
        );
        let mut arena = arena(64);
        let err = materializer()
            .materialize(&desc, &mut arena, None, NO_BUFFERS)
            .unwrap_err();
        assert_eq!(
            err,
            TensorError::MalformedQuantization {
                zero_point_bytes: 2
            }
        );
        assert_eq!(arena.used(), 0);
    }

    #[test]
    fn forward_pipeline_fields_are_neutral() {
        let mut arena = arena(64);
        let desc = TensorDescriptor::new(ElementType::Bool.raw(), &[])
            .with_name("")
            .with_variable(true);
        let t = materializer()
            .materialize(&desc, &mut arena, None, NO_BUFFERS)
            .unwrap();
        assert_eq!(t.name, NO_NAME);
        assert!(t.is_variable);
        assert_eq!(t.delegate, None);
        assert_eq!(t.buffer_handle, BufferHandle(0));
        assert!(!t.data_is_stale);
        assert!(t.quantization.is_none());
    }

    #[test]
    fn arena_data_is_aligned_to_element_width() {
        let mut arena = arena(128);
        let mut m = materializer();
        let byte_shape = [3];
        let wide_shape = [2];
        let small = TensorDescriptor::new(ElementType::Int8.raw(), &byte_shape);
        let wide = TensorDescriptor::new(ElementType::Int64.raw(), &wide_shape);
        m.materialize(&small, &mut arena, None, NO_BUFFERS).unwrap();
        let t = m.materialize(&wide, &mut arena, None, NO_BUFFERS).unwrap();
        let TensorData::ArenaOwned(handle) = t.data else {
            panic!("expected arena-owned data");
        };
        assert_eq!(handle.offset() % 8, 0);
        assert_eq!(t.data(&arena).unwrap().as_ptr() as usize % 8, 0);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn mutable_tensors_fit_and_never_overlap(
                tensors in proptest::collection::vec(
                    (0usize..ElementType::ALL.len(), proptest::collection::vec(0i32..5, 0..4)),
                    1..12,
                ),
            ) {
                let mut arena = arena(64 * 1024);
                let mut m = materializer();
                let mut regions = Vec::new();
                for (type_index, shape) in &tensors {
                    let ty = ElementType::ALL[*type_index];
                    let desc = TensorDescriptor::new(ty.raw(), shape);
                    let before = arena.used();
                    match m.materialize(&desc, &mut arena, None, NO_BUFFERS) {
                        Ok(t) => {
                            let count: usize = shape.iter().map(|&d| d as usize).product();
                            prop_assert_eq!(t.bytes, count * ty.size_of().unwrap());
                            if let TensorData::ArenaOwned(handle) = t.data {
                                prop_assert_eq!(handle.offset() % ty.size_of().unwrap(), 0);
                                regions.push((handle.offset(), handle.end()));
                            }
                            regions.push((t.dims.handle().offset(), t.dims.handle().end()));
                        }
                        Err(TensorError::UnsupportedType { .. }) => {
                            prop_assert_eq!(arena.used(), before);
                        }
                        Err(e) => prop_assert!(false, "unexpected error: {e}"),
                    }
                    prop_assert!(arena.used() <= arena.capacity());
                }
                regions.retain(|(start, end)| start != end);
                regions.sort_unstable();
                for pair in regions.windows(2) {
                    prop_assert!(pair[0].1 <= pair[1].0);
                }
            }
        }
    }
}
