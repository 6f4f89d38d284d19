//! The bump-allocated tensor arena.

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::ArenaHandle;

/// A single contiguous buffer with append-only bump allocation.
///
/// The arena is created once per model load and dropped with it. The
/// cursor only moves forward: there is no `reset`, no free, and a failed
/// request leaves the arena exactly as it was.
///
/// Backing storage is a `Vec<u64>`, so the buffer start is 8-byte aligned
/// and an offset that is a multiple of `alignment` (up to
/// [`ArenaConfig::MAX_ALIGNMENT`]) is also a suitably aligned address.
pub struct TensorArena {
    /// Backing storage. Allocated to full capacity at creation.
    words: Vec<u64>,
    /// Usable bytes; never more than `words.len() * 8`.
    capacity: usize,
    /// Bump pointer: bytes consumed so far, including padding.
    used: usize,
}

impl TensorArena {
    /// Create a zero-initialised arena from a validated config.
    pub fn new(config: &ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self {
            words: vec![0; config.word_count()],
            capacity: config.capacity,
            used: 0,
        })
    }

    /// Create an arena over caller-supplied storage.
    ///
    /// The capacity is the full byte length of `words`. Existing contents
    /// are irrelevant: every allocation is zeroed before it is handed out.
    pub fn from_words(words: Vec<u64>) -> Self {
        let capacity = words.len() * std::mem::size_of::<u64>();
        Self {
            words,
            capacity,
            used: 0,
        }
    }

    /// Bump-allocate `size` bytes at an offset that is a multiple of
    /// `alignment`.
    ///
    /// The cursor advances by the padding plus `size`. Fails with
    /// [`ArenaError::OutOfMemory`] if that would pass the capacity, and with
    /// [`ArenaError::InvalidAlignment`] if `alignment` is not a power of two
    /// in `1..=MAX_ALIGNMENT`. The cursor does not move on failure.
    pub fn allocate(&mut self, size: usize, alignment: usize) -> Result<ArenaHandle, ArenaError> {
        if !alignment.is_power_of_two() || alignment > ArenaConfig::MAX_ALIGNMENT {
            return Err(ArenaError::InvalidAlignment { alignment });
        }
        let out_of_memory = ArenaError::OutOfMemory {
            requested: size,
            available: self.remaining(),
        };
        let aligned = self
            .used
            .checked_next_multiple_of(alignment)
            .ok_or_else(|| out_of_memory.clone())?;
        let end = aligned.checked_add(size).ok_or_else(|| out_of_memory.clone())?;
        if end > self.capacity {
            return Err(out_of_memory);
        }
        self.used = end;
        let handle = ArenaHandle::new(aligned, size);
        self.bytes_mut(handle)?.fill(0);
        Ok(handle)
    }

    /// Shared view of an allocation.
    pub fn bytes(&self, handle: ArenaHandle) -> Result<&[u8], ArenaError> {
        let range = self.checked_range(handle)?;
        Ok(&self.storage()[range])
    }

    /// Mutable view of an allocation.
    pub fn bytes_mut(&mut self, handle: ArenaHandle) -> Result<&mut [u8], ArenaError> {
        let range = self.checked_range(handle)?;
        Ok(&mut self.storage_mut()[range])
    }

    /// Everything allocated so far, padding included.
    pub fn allocated(&self) -> &[u8] {
        &self.storage()[..self.used]
    }

    /// Whether `handle` lies within the allocated region.
    pub fn contains(&self, handle: ArenaHandle) -> bool {
        self.checked_range(handle).is_ok()
    }

    /// Bytes consumed so far, including alignment padding.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Total usable capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes still available before padding.
    pub fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    fn checked_range(&self, handle: ArenaHandle) -> Result<std::ops::Range<usize>, ArenaError> {
        match handle.offset.checked_add(handle.len) {
            Some(end) if end <= self.used => Ok(handle.offset..end),
            _ => Err(ArenaError::HandleOutOfBounds {
                offset: handle.offset,
                len: handle.len,
                used: self.used,
            }),
        }
    }

    fn storage(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.words)[..self.capacity]
    }

    fn storage_mut(&mut self) -> &mut [u8] {
        let capacity = self.capacity;
        &mut bytemuck::cast_slice_mut::<u64, u8>(&mut self.words)[..capacity]
    }
}
