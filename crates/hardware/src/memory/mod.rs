//! Backing Memory.
//!
//! This module implements the byte-addressable store that sits behind every
//! cache. It provides:
//! 1. **Trait:** `BackingStore`, the block-granular read/write interface caches use on
//!    fills and writebacks.
//! 2. **Buffer:** `VecMemory`, a zero-filled in-memory store.
//! 3. **File:** `FileMemory`, a store backed by an existing file on disk.
//!
//! Callers validate addresses against [`BackingStore::len`] before issuing
//! requests; the stores still refuse out-of-range blocks rather than panic.

/// In-memory backing store.
pub mod buffer;

/// File-backed backing store.
pub mod file;

pub use buffer::VecMemory;
pub use file::FileMemory;

use crate::common::MemoryError;

/// Block-granular backing memory shared by the caches of a system.
pub trait BackingStore: Send {
    /// Total size of the store in bytes.
    fn len(&self) -> usize;

    /// Returns `true` when the store holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fills `buf` with the bytes starting at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoryError::OutOfRange`] when the block extends past the end of
    /// the store, or [`MemoryError::Io`] when the underlying medium fails.
    fn read_block(&mut self, address: u32, buf: &mut [u8]) -> Result<(), MemoryError>;

    /// Stores `data` starting at `address`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`BackingStore::read_block`].
    fn write_block(&mut self, address: u32, data: &[u8]) -> Result<(), MemoryError>;
}

/// Checks that `[address, address + len)` lies inside a store of `size` bytes.
pub(crate) fn check_range(size: usize, address: u32, len: usize) -> Result<usize, MemoryError> {
    let start = address as usize;
    match start.checked_add(len) {
        Some(end) if end <= size => Ok(start),
        _ => Err(MemoryError::OutOfRange { address, len }),
    }
}
