//! Fixed-capacity bump arena for Ember tensor storage.
//!
//! One [`TensorArena`] backs one model load. It owns a single contiguous
//! byte buffer and a high-water-mark cursor; every allocation advances the
//! cursor and nothing is ever freed. Allocations are identified by
//! [`ArenaHandle`]s (offset + length) rather than pointers, so a handle can
//! never outlive the buffer it points into without going through the arena.
//!
//! # Layout
//!
//! ```text
//! TensorArena
//! ├── words: Vec<u64>   (8-byte aligned backing storage, viewed as bytes)
//! ├── capacity          (usable bytes, <= words.len() * 8)
//! └── used              (cursor, monotonically non-decreasing)
//! ```
//!
//! # Safety
//!
//! No `unsafe`. The byte view of the backing words goes through
//! `bytemuck`, and every handle is resolved with a bounds-checked slice.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;

pub use arena::TensorArena;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use handle::ArenaHandle;
