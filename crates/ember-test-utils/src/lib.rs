//! Test utilities and model fixtures for Ember development.
//!
//! Provides a [`RecordingReporter`] that keeps every diagnostic for later
//! assertions, and a [`ModelFixture`] that owns the shapes, buffers and
//! quantization bytes a real model container would hold, handing out
//! borrowed [`TensorDescriptor`](ember_core::TensorDescriptor)s over them.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{ModelFixture, TensorSpec};

use ember_core::ErrorReporter;

/// Reporter that records every message.
#[derive(Clone, Debug, Default)]
pub struct RecordingReporter {
    messages: Vec<String>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far, oldest first.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Whether any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
