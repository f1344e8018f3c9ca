//! Width-sized accessors for a single cache.
//!
//! Each accessor validates the request (natural alignment, inside backing
//! memory) before touching any state. When the block is narrower than the
//! access, the access is split into two halves, recursively, and the halves are
//! combined most-significant first.

use super::Cache;
use crate::common::addr::{from_be_slice, to_be_vec};
use crate::common::{AccessError, Width};
use crate::memory::BackingStore;

/// Checks alignment and range of a `width` access at `address`.
pub(crate) fn check_request(
    mem_len: usize,
    address: u32,
    width: Width,
) -> Result<(), AccessError> {
    if !width.is_aligned(address) {
        return Err(AccessError::Misaligned {
            address,
            width: width.bytes(),
        });
    }
    if u64::from(address) + u64::from(width.bytes()) > mem_len as u64 {
        return Err(AccessError::OutOfRange {
            address,
            width: width.bytes(),
        });
    }
    Ok(())
}

impl Cache {
    /// Reads a `width` value at `address`, big-endian.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Misaligned`] or [`AccessError::OutOfRange`] without
    /// touching the cache, and propagates memory failures.
    pub fn read(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        width: Width,
    ) -> Result<u64, AccessError> {
        check_request(mem.len(), address, width)?;
        self.read_split(mem, address, width)
    }

    fn read_split(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        width: Width,
    ) -> Result<u64, AccessError> {
        match width.half() {
            Some(half) if width.bytes() > self.block_bytes() => {
                let hi = self.read_split(mem, address, half)?;
                let lo = self.read_split(mem, address + half.bytes(), half)?;
                Ok((hi << (half.bytes() * 8)) | lo)
            }
            _ => {
                let bytes = self.read_data(mem, address, width.bytes())?;
                Ok(from_be_slice(&bytes))
            }
        }
    }

    /// Writes the low `width` bytes of `value` at `address`, big-endian.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Cache::read`].
    pub fn write(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        width: Width,
        value: u64,
    ) -> Result<(), AccessError> {
        check_request(mem.len(), address, width)?;
        self.write_split(mem, address, width, value)
    }

    fn write_split(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        width: Width,
        value: u64,
    ) -> Result<(), AccessError> {
        match width.half() {
            Some(half) if width.bytes() > self.block_bytes() => {
                let shift = half.bytes() * 8;
                self.write_split(mem, address, half, value >> shift)?;
                self.write_split(mem, address + half.bytes(), half, value & half.value_mask())
            }
            _ => self.write_data(mem, address, &to_be_vec(value, width)),
        }
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// See [`Cache::read`].
    pub fn read_byte(&mut self, mem: &mut dyn BackingStore, address: u32) -> Result<u8, AccessError> {
        self.read(mem, address, Width::Byte).map(|v| v as u8)
    }

    /// Reads a big-endian halfword.
    ///
    /// # Errors
    ///
    /// See [`Cache::read`].
    pub fn read_half_word(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
    ) -> Result<u16, AccessError> {
        self.read(mem, address, Width::HalfWord).map(|v| v as u16)
    }

    /// Reads a big-endian word.
    ///
    /// # Errors
    ///
    /// See [`Cache::read`].
    pub fn read_word(&mut self, mem: &mut dyn BackingStore, address: u32) -> Result<u32, AccessError> {
        self.read(mem, address, Width::Word).map(|v| v as u32)
    }

    /// Reads a big-endian doubleword.
    ///
    /// # Errors
    ///
    /// See [`Cache::read`].
    pub fn read_double_word(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
    ) -> Result<u64, AccessError> {
        self.read(mem, address, Width::DoubleWord)
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// See [`Cache::write`].
    pub fn write_byte(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        value: u8,
    ) -> Result<(), AccessError> {
        self.write(mem, address, Width::Byte, u64::from(value))
    }

    /// Writes a big-endian halfword.
    ///
    /// # Errors
    ///
    /// See [`Cache::write`].
    pub fn write_half_word(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        value: u16,
    ) -> Result<(), AccessError> {
        self.write(mem, address, Width::HalfWord, u64::from(value))
    }

    /// Writes a big-endian word.
    ///
    /// # Errors
    ///
    /// See [`Cache::write`].
    pub fn write_word(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        value: u32,
    ) -> Result<(), AccessError> {
        self.write(mem, address, Width::Word, u64::from(value))
    }

    /// Writes a big-endian doubleword.
    ///
    /// # Errors
    ///
    /// See [`Cache::write`].
    pub fn write_double_word(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        value: u64,
    ) -> Result<(), AccessError> {
        self.write(mem, address, Width::DoubleWord, value)
    }
}
