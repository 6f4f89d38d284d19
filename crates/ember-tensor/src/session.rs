//! Model-load sessions.
//!
//! A [`LoadSession`] owns the arena for one model load and materializes
//! descriptors strictly in model order. The first failure aborts the load;
//! space consumed by earlier tensors is not given back, since the whole
//! session is expected to be dropped.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;

use ember_arena::{ArenaConfig, ArenaError, TensorArena};
use ember_core::{BufferTable, ErrorReporter, TensorDescriptor, TensorError, TensorIndex};

use crate::materialize::{MaterializerConfig, TensorMaterializer};
use crate::reporter::TracingReporter;
use crate::runtime::RuntimeTensor;

/// Errors from [`LoadSession`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// The arena could not be created.
    Arena(ArenaError),
    /// A tensor failed to materialize.
    Tensor {
        /// Position of the failing descriptor.
        index: TensorIndex,
        /// The underlying failure.
        source: TensorError,
    },
    /// More descriptors than a [`TensorIndex`] can address.
    TooManyTensors {
        /// Number of descriptors supplied.
        count: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(e) => write!(f, "arena setup failed: {e}"),
            Self::Tensor { index, source } => write!(f, "tensor {index}: {source}"),
            Self::TooManyTensors { count } => {
                write!(f, "{count} tensors exceed the addressable tensor count")
            }
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(e) => Some(e),
            Self::Tensor { source, .. } => Some(source),
            Self::TooManyTensors { .. } => None,
        }
    }
}

impl From<ArenaError> for LoadError {
    fn from(e: ArenaError) -> Self {
        Self::Arena(e)
    }
}

/// The tensors produced by one [`LoadSession::load`] call.
///
/// Indexed by model order, with a name index for named tensors. When two
/// tensors share a name, the first one wins.
#[derive(Debug)]
pub struct TensorTable<'m> {
    tensors: Vec<RuntimeTensor<'m>>,
    by_name: IndexMap<&'m str, TensorIndex>,
}

impl<'m> TensorTable<'m> {
    /// Tensor at `index`.
    pub fn get(&self, index: TensorIndex) -> Option<&RuntimeTensor<'m>> {
        self.tensors.get(index.0 as usize)
    }

    /// Mutable tensor at `index`, for later pipeline stages.
    pub fn get_mut(&mut self, index: TensorIndex) -> Option<&mut RuntimeTensor<'m>> {
        self.tensors.get_mut(index.0 as usize)
    }

    /// Index of the first tensor called `name`.
    pub fn index_of(&self, name: &str) -> Option<TensorIndex> {
        self.by_name.get(name).copied()
    }

    /// First tensor called `name`.
    pub fn by_name(&self, name: &str) -> Option<&RuntimeTensor<'m>> {
        self.index_of(name).and_then(|i| self.get(i))
    }

    /// All tensors in model order.
    pub fn iter(&self) -> impl Iterator<Item = &RuntimeTensor<'m>> {
        self.tensors.iter()
    }

    /// Number of tensors.
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Consume the table, returning the tensors in model order.
    pub fn into_tensors(self) -> Vec<RuntimeTensor<'m>> {
        self.tensors
    }
}

/// Owns the arena and materializer for one model load.
pub struct LoadSession<R: ErrorReporter = TracingReporter> {
    arena: TensorArena,
    materializer: TensorMaterializer<R>,
}

impl LoadSession<TracingReporter> {
    /// Create a session with a fresh arena, reporting through `tracing`.
    pub fn new(arena: &ArenaConfig, config: MaterializerConfig) -> Result<Self, LoadError> {
        Ok(Self::with_parts(
            TensorArena::new(arena)?,
            TensorMaterializer::new(config),
        ))
    }
}

impl<R: ErrorReporter> LoadSession<R> {
    /// Create a session from an existing arena and materializer.
    pub fn with_parts(arena: TensorArena, materializer: TensorMaterializer<R>) -> Self {
        Self {
            arena,
            materializer,
        }
    }

    /// Materialize `descriptors` in order.
    ///
    /// `preallocated` maps tensor positions to caller-owned buffers; entries
    /// for tensors that turn out to be constant are ignored. The first
    /// failure is returned with the position of the failing tensor.
    pub fn load<'m, B, P>(
        &mut self,
        descriptors: &[TensorDescriptor<'m>],
        buffers: &'m B,
        preallocated: P,
    ) -> Result<TensorTable<'m>, LoadError>
    where
        B: BufferTable + ?Sized,
        P: IntoIterator<Item = (TensorIndex, &'m mut [u8])>,
    {
        let count = descriptors.len();
        if u32::try_from(count).is_err() {
            return Err(LoadError::TooManyTensors { count });
        }
        let mut preallocated: IndexMap<TensorIndex, &'m mut [u8]> =
            preallocated.into_iter().collect();

        let mut tensors = Vec::with_capacity(count);
        let mut by_name = IndexMap::new();
        for (i, descriptor) in descriptors.iter().enumerate() {
            let index = TensorIndex(i as u32);
            let tensor = self
                .materializer
                .materialize(
                    descriptor,
                    &mut self.arena,
                    preallocated.swap_remove(&index),
                    buffers,
                )
                .map_err(|source| LoadError::Tensor { index, source })?;
            if tensor.has_name() {
                by_name.entry(tensor.name).or_insert(index);
            }
            tensors.push(tensor);
        }

        if !preallocated.is_empty() {
            tracing::warn!(
                unused = preallocated.len(),
                "preallocated buffers supplied for tensors outside the model"
            );
        }
        tracing::debug!(
            tensors = tensors.len(),
            arena_used = self.arena.used(),
            arena_capacity = self.arena.capacity(),
            "model tensors materialized"
        );
        Ok(TensorTable { tensors, by_name })
    }

    /// The session's arena, for resolving tensor data and dimensions.
    pub fn arena(&self) -> &TensorArena {
        &self.arena
    }

    /// Mutable access to the arena, for writing tensor data.
    pub fn arena_mut(&mut self) -> &mut TensorArena {
        &mut self.arena
    }

    /// The materializer.
    pub fn materializer(&self) -> &TensorMaterializer<R> {
        &self.materializer
    }

    /// Consume the session, returning the arena.
    pub fn into_arena(self) -> TensorArena {
        self.arena
    }
}
