//! Runtime tensor materialization for Ember.
//!
//! Takes pre-parsed [`TensorDescriptor`](ember_core::TensorDescriptor)s,
//! one at a time and in model order, and produces [`RuntimeTensor`]
//! records backed by one of three storage classes:
//!
//! - **Constant alias:** a read-only borrow of data embedded in the model.
//! - **Arena owned:** a fresh, zeroed region of the session's
//!   [`TensorArena`](ember_arena::TensorArena).
//! - **Preallocated:** a mutable buffer the caller supplied for the tensor.
//!
//! ```text
//! LoadSession
//! ├── TensorArena            (one per model load, append-only)
//! └── TensorMaterializer<R>  (config + ErrorReporter)
//!       └── materialize(descriptor) → RuntimeTensor
//!             ├── TensorData   (ConstantAlias | ArenaOwned | Preallocated)
//!             └── DimsHandle   (rank + dims, stored in the arena)
//! ```
//!
//! Work is single-threaded and synchronous. Nothing is ever freed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod dims;
pub mod materialize;
pub mod reporter;
pub mod runtime;
pub mod session;

pub use dims::DimsHandle;
pub use materialize::{MaterializerConfig, TensorMaterializer};
pub use reporter::{NullReporter, TracingReporter};
pub use runtime::{AllocationKind, BufferHandle, DelegateHandle, RuntimeTensor, TensorData, NO_NAME};
pub use session::{LoadError, LoadSession, TensorTable};
