//! Width-sized accessors on a cache system.
//!
//! Requests are checked once at full width (known cache, natural alignment,
//! inside memory). An access wider than the system block is then serviced as
//! two half-width accesses, recursively, most-significant half first.

use super::system::CacheSystem;
use crate::cache::access::check_request;
use crate::common::addr::{from_be_slice, to_be_vec};
use crate::common::{AccessError, CacheId, Width};

impl CacheSystem {
    fn check_width(&self, id: CacheId, address: u32, width: Width) -> Result<(), AccessError> {
        if !self.caches.contains_key(&id) {
            return Err(AccessError::UnknownCache(id));
        }
        check_request(self.memory.len(), address, width)
    }

    /// Reads a big-endian `width` value at `address` through cache `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownCache`], [`AccessError::Misaligned`] or
    /// [`AccessError::OutOfRange`] without side effects, and propagates memory
    /// and directory failures.
    pub fn read_width(&mut self, address: u32, id: CacheId, width: Width) -> Result<u64, AccessError> {
        self.check_width(id, address, width)?;
        self.read_split(address, id, width)
    }

    fn read_split(&mut self, address: u32, id: CacheId, width: Width) -> Result<u64, AccessError> {
        match width.half() {
            Some(half) if width.bytes() > self.block_bytes => {
                let hi = self.read_split(address, id, half)?;
                let lo = self.read_split(address + half.bytes(), id, half)?;
                Ok((hi << (half.bytes() * 8)) | lo)
            }
            _ => Ok(from_be_slice(&self.read(address, id, width.bytes())?)),
        }
    }

    /// Writes the low `width` bytes of `value` at `address` through cache `id`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`CacheSystem::read_width`].
    pub fn write_width(
        &mut self,
        address: u32,
        id: CacheId,
        width: Width,
        value: u64,
    ) -> Result<(), AccessError> {
        self.check_width(id, address, width)?;
        self.write_split(address, id, width, value)
    }

    fn write_split(
        &mut self,
        address: u32,
        id: CacheId,
        width: Width,
        value: u64,
    ) -> Result<(), AccessError> {
        match width.half() {
            Some(half) if width.bytes() > self.block_bytes => {
                self.write_split(address, id, half, value >> (half.bytes() * 8))?;
                self.write_split(address + half.bytes(), id, half, value & half.value_mask())
            }
            _ => self.write(address, id, &to_be_vec(value, width)),
        }
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// See [`CacheSystem::read_width`].
    pub fn read_byte(&mut self, address: u32, id: CacheId) -> Result<u8, AccessError> {
        self.read_width(address, id, Width::Byte).map(|v| v as u8)
    }

    /// Reads a big-endian halfword.
    ///
    /// # Errors
    ///
    /// See [`CacheSystem::read_width`].
    pub fn read_half_word(&mut self, address: u32, id: CacheId) -> Result<u16, AccessError> {
        self.read_width(address, id, Width::HalfWord).map(|v| v as u16)
    }

    /// Reads a big-endian word.
    ///
    /// # Errors
    ///
    /// See [`CacheSystem::read_width`].
    pub fn read_word(&mut self, address: u32, id: CacheId) -> Result<u32, AccessError> {
        self.read_width(address, id, Width::Word).map(|v| v as u32)
    }

    /// Reads a big-endian doubleword.
    ///
    /// # Errors
    ///
    /// See [`CacheSystem::read_width`].
    pub fn read_double_word(&mut self, address: u32, id: CacheId) -> Result<u64, AccessError> {
        self.read_width(address, id, Width::DoubleWord)
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// See [`CacheSystem::write_width`].
    pub fn write_byte(&mut self, address: u32, id: CacheId, value: u8) -> Result<(), AccessError> {
        self.write_width(address, id, Width::Byte, u64::from(value))
    }

    /// Writes a big-endian halfword.
    ///
    /// # Errors
    ///
    /// See [`CacheSystem::write_width`].
    pub fn write_half_word(
        &mut self,
        address: u32,
        id: CacheId,
        value: u16,
    ) -> Result<(), AccessError> {
        self.write_width(address, id, Width::HalfWord, u64::from(value))
    }

    /// Writes a big-endian word.
    ///
    /// # Errors
    ///
    /// See [`CacheSystem::write_width`].
    pub fn write_word(&mut self, address: u32, id: CacheId, value: u32) -> Result<(), AccessError> {
        self.write_width(address, id, Width::Word, u64::from(value))
    }

    /// Writes a big-endian doubleword.
    ///
    /// # Errors
    ///
    /// See [`CacheSystem::write_width`].
    pub fn write_double_word(
        &mut self,
        address: u32,
        id: CacheId,
        value: u64,
    ) -> Result<(), AccessError> {
        self.write_width(address, id, Width::DoubleWord, value)
    }
}
