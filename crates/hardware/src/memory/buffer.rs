//! In-memory backing store.
//!
//! A plain zero-initialised `Vec<u8>`. Used by tests and by configurations that
//! do not name a memory file.

use super::{BackingStore, check_range};
use crate::common::MemoryError;

/// Zero-filled backing memory held entirely in host RAM.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VecMemory {
    bytes: Vec<u8>,
}

impl VecMemory {
    /// Creates a zero-filled store of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Wraps existing contents.
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Returns the full contents of the store.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Reads one byte directly, bypassing any cache.
    ///
    /// # Panics
    ///
    /// Panics if `address` is out of range.
    pub fn read_u8(&self, address: usize) -> u8 {
        self.bytes[address]
    }

    /// Writes one byte directly, bypassing any cache.
    ///
    /// # Panics
    ///
    /// Panics if `address` is out of range.
    pub fn write_u8(&mut self, address: usize, value: u8) {
        self.bytes[address] = value;
    }
}

impl BackingStore for VecMemory {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn read_block(&mut self, address: u32, buf: &mut [u8]) -> Result<(), MemoryError> {
        let start = check_range(self.bytes.len(), address, buf.len())?;
        buf.copy_from_slice(&self.bytes[start..start + buf.len()]);
        Ok(())
    }

    fn write_block(&mut self, address: u32, data: &[u8]) -> Result<(), MemoryError> {
        let start = check_range(self.bytes.len(), address, data.len())?;
        self.bytes[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }
}
