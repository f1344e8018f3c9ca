//! Address, cache-identifier, and access-width types.
//!
//! This module defines the small strong types shared by the cache engine and the
//! coherence layer. It provides the following:
//! 1. **Block identity:** `BlockAddr`, a block-aligned address used as the directory key.
//! 2. **Cache naming:** `CacheId`, the identifier a system uses to address one cache.
//! 3. **Access widths:** `Width`, the byte/halfword/word/doubleword access sizes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A block-aligned address at a fixed block granularity.
///
/// Two addresses that fall in the same block map to the same `BlockAddr`,
/// independent of any particular cache's tag/index split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BlockAddr(pub u32);

impl BlockAddr {
    /// Clears the offset bits of `address` for blocks of `block_bytes` bytes.
    ///
    /// `block_bytes` must be a power of two.
    #[inline(always)]
    pub const fn containing(address: u32, block_bytes: u32) -> Self {
        Self(address & !(block_bytes - 1))
    }

    /// Returns the raw block-aligned address.
    #[inline(always)]
    pub const fn val(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for BlockAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Identifier of a cache within a cache system.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CacheId(pub u8);

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cache{}", self.0)
    }
}

/// Width of a single memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Width {
    /// 1 byte.
    Byte,
    /// 2 bytes.
    HalfWord,
    /// 4 bytes.
    Word,
    /// 8 bytes.
    DoubleWord,
}

impl Width {
    /// Maps a byte count onto a width; only 1, 2, 4 and 8 are accepted.
    pub const fn from_bytes(bytes: u32) -> Option<Self> {
        match bytes {
            1 => Some(Self::Byte),
            2 => Some(Self::HalfWord),
            4 => Some(Self::Word),
            8 => Some(Self::DoubleWord),
            _ => None,
        }
    }

    /// Size of the access in bytes.
    #[inline(always)]
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::HalfWord => 2,
            Self::Word => 4,
            Self::DoubleWord => 8,
        }
    }

    /// The width of each half when an access is split in two, if it can be.
    pub const fn half(self) -> Option<Self> {
        match self {
            Self::Byte => None,
            Self::HalfWord => Some(Self::Byte),
            Self::Word => Some(Self::HalfWord),
            Self::DoubleWord => Some(Self::Word),
        }
    }

    /// Returns `true` when `address` is naturally aligned for this width.
    #[inline(always)]
    pub const fn is_aligned(self, address: u32) -> bool {
        address % self.bytes() == 0
    }

    /// Mask covering the value bits of this width.
    pub const fn value_mask(self) -> u64 {
        match self {
            Self::DoubleWord => u64::MAX,
            _ => (1u64 << (self.bytes() * 8)) - 1,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Byte => "byte",
            Self::HalfWord => "halfword",
            Self::Word => "word",
            Self::DoubleWord => "doubleword",
        };
        f.write_str(name)
    }
}

/// Packs `bytes` (most significant first) into an integer.
pub fn from_be_slice(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Splits the low `width` bytes of `value` into big-endian order.
pub fn to_be_vec(value: u64, width: Width) -> Vec<u8> {
    let n = width.bytes() as usize;
    value.to_be_bytes()[8 - n..].to_vec()
}
