//! Bit-Field Codec.
//!
//! Reads and writes arbitrarily aligned, arbitrarily sized fields inside a flat
//! byte buffer. Bit order is MSB-first: bit 0 of the buffer is the most
//! significant bit of byte 0, and the first addressed bit of a field becomes the
//! highest-order bit of the value. This module provides:
//! 1. **Scalar fields:** `read_bits` / `write_bits` for fields of up to 64 bits.
//! 2. **Byte strings:** `read_bytes` / `write_bytes` for data that starts at any bit.
//! 3. **Descriptors:** `BitField`, a typed (offset, length) pair used by the cache layout.
//!
//! All indexing is bounds-checked; addressing past the end of the buffer is a
//! programming error and panics.

/// Maximum width of a scalar field handled by [`read_bits`] and [`write_bits`].
pub const MAX_FIELD_BITS: u32 = 64;

/// Returns a mask with the low `n` bits set (`n <= 8`).
#[inline(always)]
const fn low_mask(n: u32) -> u8 {
    ((1u16 << n) - 1) as u8
}

/// Reads a `len`-bit field starting `bit_offset` bits into `buf`.
///
/// # Arguments
///
/// * `buf` - Packed buffer to read from.
/// * `bit_offset` - Position of the field's most significant bit.
/// * `len` - Field width in bits (`0..=64`).
///
/// # Returns
///
/// The field value, right-aligned.
///
/// # Panics
///
/// Panics if `len > 64` or the field extends past the end of `buf`.
pub fn read_bits(buf: &[u8], bit_offset: u64, len: u32) -> u64 {
    assert!(len <= MAX_FIELD_BITS, "field of {len} bits exceeds 64");
    let mut value = 0u64;
    let mut pos = bit_offset;
    let mut remaining = len;
    while remaining > 0 {
        let byte = buf[(pos >> 3) as usize];
        let avail = 8 - (pos & 7) as u32;
        let take = avail.min(remaining);
        let chunk = (byte >> (avail - take)) & low_mask(take);
        value = (value << take) | u64::from(chunk);
        remaining -= take;
        pos += u64::from(take);
    }
    value
}

/// Writes the low `len` bits of `value` as a field starting `bit_offset` bits
/// into `buf`. Bits outside the field are preserved.
///
/// # Panics
///
/// Panics if `len > 64` or the field extends past the end of `buf`.
pub fn write_bits(buf: &mut [u8], bit_offset: u64, len: u32, value: u64) {
    assert!(len <= MAX_FIELD_BITS, "field of {len} bits exceeds 64");
    let mut pos = bit_offset;
    let mut remaining = len;
    while remaining > 0 {
        let avail = 8 - (pos & 7) as u32;
        let take = avail.min(remaining);
        let shift = avail - take;
        let chunk = (value >> (remaining - take)) as u8 & low_mask(take);
        let mask = low_mask(take) << shift;
        let byte = &mut buf[(pos >> 3) as usize];
        *byte = (*byte & !mask) | (chunk << shift);
        remaining -= take;
        pos += u64::from(take);
    }
}

/// Copies `out.len()` bytes starting at `bit_offset` into `out`.
///
/// When `bit_offset` is byte aligned this is a plain slice copy; otherwise each
/// output byte is merged from two neighbouring storage bytes.
pub fn read_bytes(buf: &[u8], bit_offset: u64, out: &mut [u8]) {
    if bit_offset & 7 == 0 {
        let start = (bit_offset >> 3) as usize;
        out.copy_from_slice(&buf[start..start + out.len()]);
        return;
    }
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = read_bits(buf, bit_offset + 8 * i as u64, 8) as u8;
    }
}

/// Writes `data` into `buf` starting at `bit_offset`, preserving the bits that
/// surround the written range.
pub fn write_bytes(buf: &mut [u8], bit_offset: u64, data: &[u8]) {
    if bit_offset & 7 == 0 {
        let start = (bit_offset >> 3) as usize;
        buf[start..start + data.len()].copy_from_slice(data);
        return;
    }
    for (i, &byte) in data.iter().enumerate() {
        write_bits(buf, bit_offset + 8 * i as u64, 8, u64::from(byte));
    }
}

/// A field descriptor: `len` bits starting at absolute bit `offset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitField {
    /// Absolute bit position of the field's most significant bit.
    pub offset: u64,
    /// Width in bits.
    pub len: u32,
}

impl BitField {
    /// Creates a field descriptor.
    #[inline(always)]
    pub const fn new(offset: u64, len: u32) -> Self {
        Self { offset, len }
    }

    /// Reads this field out of `buf`.
    #[inline]
    pub fn get(&self, buf: &[u8]) -> u64 {
        read_bits(buf, self.offset, self.len)
    }

    /// Stores `value` (truncated to the field width) into `buf`.
    #[inline]
    pub fn set(&self, buf: &mut [u8], value: u64) {
        write_bits(buf, self.offset, self.len, value);
    }

    /// Reads a single-bit field as a boolean.
    #[inline]
    pub fn flag(&self, buf: &[u8]) -> bool {
        self.get(buf) != 0
    }

    /// Returns the first bit position after this field.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.offset + self.len as u64
    }
}
