//! Collaborator traits: constant buffers and diagnostics.

use crate::id::BufferIndex;

/// Read-only access to the model's constant buffers.
///
/// Implemented by the model container. Returns `None` if the index is out
/// of range; an empty slice means the buffer carries no data.
pub trait BufferTable {
    /// Raw bytes of the buffer at `index`.
    fn buffer(&self, index: BufferIndex) -> Option<&[u8]>;

    /// Number of buffers in the table.
    fn buffer_count(&self) -> usize;
}

impl BufferTable for [&[u8]] {
    fn buffer(&self, index: BufferIndex) -> Option<&[u8]> {
        self.get(index.0 as usize).copied()
    }

    fn buffer_count(&self) -> usize {
        self.len()
    }
}

impl BufferTable for [Vec<u8>] {
    fn buffer(&self, index: BufferIndex) -> Option<&[u8]> {
        self.get(index.0 as usize).map(Vec::as_slice)
    }

    fn buffer_count(&self) -> usize {
        self.len()
    }
}

impl<T: BufferTable + ?Sized> BufferTable for &T {
    fn buffer(&self, index: BufferIndex) -> Option<&[u8]> {
        (**self).buffer(index)
    }

    fn buffer_count(&self) -> usize {
        (**self).buffer_count()
    }
}

impl BufferTable for Vec<Vec<u8>> {
    fn buffer(&self, index: BufferIndex) -> Option<&[u8]> {
        self.as_slice().buffer(index)
    }

    fn buffer_count(&self) -> usize {
        self.len()
    }
}

/// Sink for human-readable diagnostics.
///
/// Errors are always returned as values as well; a reporter is never the
/// only channel for a failure.
pub trait ErrorReporter {
    /// Record one formatted diagnostic.
    fn report(&mut self, message: &str);
}

impl<R: ErrorReporter + ?Sized> ErrorReporter for &mut R {
    fn report(&mut self, message: &str) {
        (**self).report(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_table_lookup() {
        let a: &[u8] = &[1, 2, 3];
        let table: [&[u8]; 2] = [&[], a];
        assert_eq!(table[..].buffer(BufferIndex(0)), Some(&[][..]));
        assert_eq!(table[..].buffer(BufferIndex(1)), Some(a));
        assert_eq!(table[..].buffer(BufferIndex(2)), None);
        assert_eq!(table[..].buffer_count(), 2);
    }

    #[test]
    fn vec_table_lookup() {
        let table = vec![Vec::new(), vec![9u8; 4]];
        assert_eq!(table.buffer(BufferIndex(1)).map(<[u8]>::len), Some(4));
        assert_eq!(table.buffer_count(), 2);
    }
}
