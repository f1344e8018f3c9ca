//! Bit-packed block layout.
//!
//! Every block occupies `3 + lru_bits + tag_bits + 8 * block_bytes` contiguous
//! bits in the order `valid, dirty, shared, lru, tag, data`. Blocks follow each
//! other with no per-block padding; instead, enough leading padding bits are
//! placed once at the start of the buffer to round its length up to a whole
//! number of bytes.

use super::geometry::CacheGeometry;
use crate::common::BitField;

/// Number of single-bit flags (valid, dirty, shared) at the head of a block.
const FLAG_BITS: u64 = 3;

/// Bit positions of every field of every block in a cache's storage buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    lru_bits: u32,
    tag_bits: u32,
    data_bits: u64,
    block_bits: u64,
    padding_bits: u64,
    num_blocks: u32,
}

impl BlockLayout {
    /// Computes the layout for a (validated) geometry.
    pub const fn new(geometry: &CacheGeometry) -> Self {
        let lru_bits = geometry.lru_bits();
        let tag_bits = geometry.tag_bits();
        let data_bits = 8 * geometry.block_bytes as u64;
        let block_bits = FLAG_BITS + lru_bits as u64 + tag_bits as u64 + data_bits;
        let num_blocks = geometry.num_blocks();
        let used = block_bits * num_blocks as u64;
        Self {
            lru_bits,
            tag_bits,
            data_bits,
            block_bits,
            padding_bits: (8 - (used & 7)) & 7,
            num_blocks,
        }
    }

    /// Bits taken by one block.
    pub const fn block_bits(&self) -> u64 {
        self.block_bits
    }

    /// Leading padding bits at the start of the buffer.
    pub const fn padding_bits(&self) -> u64 {
        self.padding_bits
    }

    /// Size of the storage buffer in bytes.
    pub const fn storage_bytes(&self) -> usize {
        ((self.padding_bits + self.block_bits * self.num_blocks as u64) >> 3) as usize
    }

    /// First bit of `block`.
    #[inline(always)]
    pub const fn block_start(&self, block: u32) -> u64 {
        self.padding_bits + block as u64 * self.block_bits
    }

    /// The valid flag of `block`.
    #[inline]
    pub const fn valid(&self, block: u32) -> BitField {
        BitField::new(self.block_start(block), 1)
    }

    /// The dirty flag of `block`.
    #[inline]
    pub const fn dirty(&self, block: u32) -> BitField {
        BitField::new(self.block_start(block) + 1, 1)
    }

    /// The shared (coherence) flag of `block`.
    #[inline]
    pub const fn shared(&self, block: u32) -> BitField {
        BitField::new(self.block_start(block) + 2, 1)
    }

    /// The LRU rank of `block`.
    #[inline]
    pub const fn lru(&self, block: u32) -> BitField {
        BitField::new(self.block_start(block) + FLAG_BITS, self.lru_bits)
    }

    /// The tag of `block`.
    #[inline]
    pub const fn tag(&self, block: u32) -> BitField {
        BitField::new(
            self.block_start(block) + FLAG_BITS + self.lru_bits as u64,
            self.tag_bits,
        )
    }

    /// Bit position of byte `offset` of the data of `block`.
    #[inline]
    pub const fn data(&self, block: u32, offset: u32) -> u64 {
        self.tag(block).end() + 8 * offset as u64
    }

    /// Bits of data per block.
    pub const fn data_bits(&self) -> u64 {
        self.data_bits
    }
}
