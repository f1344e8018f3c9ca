//! Cache geometry and address decomposition.
//!
//! A 32-bit address splits into `Tag : Index : Offset`:
//!
//! ```text
//!  31                                                       0
//! +--------------------+-------------------+-----------------+
//! |   tag (tag_bits)   | index (index_bits)| offset          |
//! +--------------------+-------------------+-----------------+
//! ```
//!
//! `offset_bits = log2(block_bytes)`, `index_bits = log2(sets)`, and the tag
//! takes whatever is left. All three are pure bit slices of the address and
//! are derived from the geometry alone.

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;

/// Width of a simulated address in bits.
pub const ADDRESS_BITS: u32 = 32;

/// Size parameters of one set-associative cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheGeometry {
    /// Associativity (blocks per set).
    pub ways: u32,
    /// Block size in bytes.
    pub block_bytes: u32,
    /// Total data capacity in bytes.
    pub total_bytes: u32,
}

/// The three bit slices of an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressParts {
    /// High-order tag bits.
    pub tag: u32,
    /// Set index.
    pub index: u32,
    /// Byte offset within the block.
    pub offset: u32,
}

impl CacheGeometry {
    /// Creates a geometry without validating it; see [`CacheGeometry::validate`].
    pub const fn new(ways: u32, block_bytes: u32, total_bytes: u32) -> Self {
        Self {
            ways,
            block_bytes,
            total_bytes,
        }
    }

    /// Checks the construction rules: every size is a power of two, a block fits
    /// in the cache, and there are at least `ways` blocks.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGeometry`] naming the first rule broken.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |reason| {
            Err(ConfigError::InvalidGeometry {
                ways: self.ways,
                block_bytes: self.block_bytes,
                total_bytes: self.total_bytes,
                reason,
            })
        };
        if !self.ways.is_power_of_two() {
            return fail("ways must be a power of two");
        }
        if !self.block_bytes.is_power_of_two() {
            return fail("block size must be a power of two");
        }
        if !self.total_bytes.is_power_of_two() {
            return fail("total size must be a power of two");
        }
        if self.block_bytes > self.total_bytes {
            return fail("block size exceeds total size");
        }
        if self.total_bytes / self.block_bytes < self.ways {
            return fail("fewer blocks than ways");
        }
        Ok(())
    }

    /// Number of blocks in the cache.
    #[inline(always)]
    pub const fn num_blocks(&self) -> u32 {
        self.total_bytes / self.block_bytes
    }

    /// Number of sets.
    #[inline(always)]
    pub const fn num_sets(&self) -> u32 {
        self.num_blocks() / self.ways
    }

    /// Bits of the address used as the byte offset.
    #[inline(always)]
    pub const fn offset_bits(&self) -> u32 {
        self.block_bytes.trailing_zeros()
    }

    /// Bits of the address used as the set index.
    #[inline(always)]
    pub const fn index_bits(&self) -> u32 {
        self.num_sets().trailing_zeros()
    }

    /// Bits of the address stored as the tag.
    #[inline(always)]
    pub const fn tag_bits(&self) -> u32 {
        ADDRESS_BITS - self.offset_bits() - self.index_bits()
    }

    /// Bits needed to hold an LRU rank in `[0, ways)`.
    #[inline(always)]
    pub const fn lru_bits(&self) -> u32 {
        self.ways.trailing_zeros()
    }

    /// Extracts the tag of `address`.
    #[inline]
    pub const fn tag_of(&self, address: u32) -> u32 {
        address >> (self.offset_bits() + self.index_bits())
    }

    /// Extracts the set index of `address`.
    #[inline]
    pub const fn index_of(&self, address: u32) -> u32 {
        (address >> self.offset_bits()) & (self.num_sets() - 1)
    }

    /// Extracts the byte offset of `address`.
    #[inline]
    pub const fn offset_of(&self, address: u32) -> u32 {
        address & (self.block_bytes - 1)
    }

    /// Splits `address` into its tag, index and offset.
    pub const fn decompose(&self, address: u32) -> AddressParts {
        AddressParts {
            tag: self.tag_of(address),
            index: self.index_of(address),
            offset: self.offset_of(address),
        }
    }

    /// Rebuilds an address from its parts.
    pub const fn compose(&self, parts: AddressParts) -> u32 {
        let tag_shift = self.offset_bits() + self.index_bits();
        (((parts.tag as u64) << tag_shift) as u32)
            | (parts.index << self.offset_bits())
            | parts.offset
    }
}
