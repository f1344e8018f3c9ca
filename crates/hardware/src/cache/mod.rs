//! Bit-Packed Set-Associative Cache.
//!
//! This module implements a single cache whose entire contents (flags, LRU
//! ranks, tags and data) live in one bit-packed byte buffer. It provides:
//! 1. **Geometry:** Validated sizes and the `Tag : Index : Offset` address split.
//! 2. **Layout:** Bit positions of every field of every block.
//! 3. **Metadata:** Typed accessors for valid/dirty/shared/LRU/tag and the derived
//!    coherence state.
//! 4. **Replacement:** Strict-rank LRU with deterministic victim selection.
//! 5. **Operations:** Block reads, fills, writes, whole-block installs, evictions,
//!    and width-sized accessors on top of them.
//!
//! Blocks are numbered globally as `set * ways + way`.

/// Byte/halfword/word/doubleword accessors.
pub mod access;

/// Tabular debug rendering.
pub mod dump;

/// Sizes and address decomposition.
pub mod geometry;

/// Bit positions of block fields.
pub mod layout;

/// LRU ranking and victim selection.
pub mod lru;

/// Fills, writes, evictions and flushes against backing memory.
pub mod ops;

/// Coherence state encoding.
pub mod state;

pub use geometry::{AddressParts, CacheGeometry};
pub use layout::BlockLayout;
pub use lru::EvictionInfo;
pub use state::CoherenceState;

use crate::common::{BlockAddr, ConfigError, bits};
use crate::stats::CacheStats;

/// A single set-associative cache.
#[derive(Clone, Debug)]
pub struct Cache {
    geometry: CacheGeometry,
    layout: BlockLayout,
    storage: Vec<u8>,
    stats: CacheStats,
}

impl Cache {
    /// Creates an empty cache.
    ///
    /// All blocks start invalid. Within each set, way `w` starts at LRU rank
    /// `ways - 1 - w`, so ranks form a permutation from the outset and cold
    /// fills proceed in way order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGeometry`] if `geometry` is invalid.
    pub fn new(geometry: CacheGeometry) -> Result<Self, ConfigError> {
        geometry.validate()?;
        let layout = BlockLayout::new(&geometry);
        let mut cache = Self {
            geometry,
            layout,
            storage: vec![0; layout.storage_bytes()],
            stats: CacheStats::default(),
        };
        let ways = geometry.ways;
        for block in 0..geometry.num_blocks() {
            cache.set_lru(block, ways - 1 - block % ways);
        }
        Ok(cache)
    }

    /// Geometry this cache was built with.
    pub const fn geometry(&self) -> &CacheGeometry {
        &self.geometry
    }

    /// Field layout of the storage buffer.
    pub const fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Access and hit counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    pub(crate) const fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    /// Associativity.
    #[inline(always)]
    pub const fn ways(&self) -> u32 {
        self.geometry.ways
    }

    /// Block size in bytes.
    #[inline(always)]
    pub const fn block_bytes(&self) -> u32 {
        self.geometry.block_bytes
    }

    /// Number of blocks.
    #[inline(always)]
    pub const fn num_blocks(&self) -> u32 {
        self.geometry.num_blocks()
    }

    /// Number of sets.
    #[inline(always)]
    pub const fn num_sets(&self) -> u32 {
        self.geometry.num_sets()
    }

    /// Set that `block` belongs to.
    #[inline(always)]
    pub const fn set_of(&self, block: u32) -> u32 {
        block / self.geometry.ways
    }

    /// Block numbers of the set that `address` maps to.
    pub const fn set_blocks(&self, address: u32) -> std::ops::Range<u32> {
        let first = self.geometry.index_of(address) * self.geometry.ways;
        first..first + self.geometry.ways
    }

    /// Tag bits of `address` for this cache.
    pub const fn tag_of(&self, address: u32) -> u32 {
        self.geometry.tag_of(address)
    }

    /// Set index of `address` for this cache.
    pub const fn index_of(&self, address: u32) -> u32 {
        self.geometry.index_of(address)
    }

    /// Byte offset of `address` within its block.
    pub const fn offset_of(&self, address: u32) -> u32 {
        self.geometry.offset_of(address)
    }

    // ── Raw block metadata ────────────────────────────────────

    /// Valid bit of `block`.
    pub fn valid(&self, block: u32) -> bool {
        self.layout.valid(block).flag(&self.storage)
    }

    /// Dirty bit of `block`.
    pub fn dirty(&self, block: u32) -> bool {
        self.layout.dirty(block).flag(&self.storage)
    }

    /// Shared (coherence) bit of `block`.
    pub fn shared(&self, block: u32) -> bool {
        self.layout.shared(block).flag(&self.storage)
    }

    /// LRU rank of `block` (0 = most recently used).
    pub fn lru(&self, block: u32) -> u32 {
        self.layout.lru(block).get(&self.storage) as u32
    }

    /// Stored tag of `block`.
    pub fn tag(&self, block: u32) -> u32 {
        self.layout.tag(block).get(&self.storage) as u32
    }

    /// Sets the valid bit of `block`.
    pub fn set_valid(&mut self, block: u32, valid: bool) {
        self.layout.valid(block).set(&mut self.storage, u64::from(valid));
    }

    /// Sets the dirty bit of `block`.
    pub fn set_dirty(&mut self, block: u32, dirty: bool) {
        self.layout.dirty(block).set(&mut self.storage, u64::from(dirty));
    }

    /// Sets the shared bit of `block`.
    pub fn set_shared(&mut self, block: u32, shared: bool) {
        self.layout.shared(block).set(&mut self.storage, u64::from(shared));
    }

    /// Sets the LRU rank of `block`.
    pub fn set_lru(&mut self, block: u32, rank: u32) {
        debug_assert!(rank < self.geometry.ways, "rank {rank} out of range");
        self.layout.lru(block).set(&mut self.storage, u64::from(rank));
    }

    /// Sets the stored tag of `block`.
    pub fn set_tag(&mut self, block: u32, tag: u32) {
        self.layout.tag(block).set(&mut self.storage, u64::from(tag));
    }

    /// Coherence state of `block`, derived from its flags.
    pub fn state(&self, block: u32) -> CoherenceState {
        CoherenceState::from_bits(self.valid(block), self.dirty(block), self.shared(block))
    }

    /// Rewrites the flags of `block` to encode `state`.
    ///
    /// `Shared` leaves the dirty bit alone; every other state fixes all three.
    pub fn set_state(&mut self, block: u32, state: CoherenceState) {
        match state {
            CoherenceState::Invalid => {
                self.set_valid(block, false);
                self.set_dirty(block, false);
                self.set_shared(block, false);
            }
            CoherenceState::Exclusive => {
                self.set_valid(block, true);
                self.set_dirty(block, false);
                self.set_shared(block, false);
            }
            CoherenceState::Shared => {
                self.set_valid(block, true);
                self.set_shared(block, true);
            }
            CoherenceState::Modified => {
                self.set_valid(block, true);
                self.set_dirty(block, true);
                self.set_shared(block, false);
            }
        }
    }

    // ── Block data ────────────────────────────────────────────

    /// Returns the whole data payload of `block`, whether or not it is valid.
    pub fn read_block(&self, block: u32) -> Vec<u8> {
        self.block_data(block, 0, self.geometry.block_bytes)
    }

    /// Returns `len` data bytes of `block` starting at byte `offset`.
    pub fn block_data(&self, block: u32, offset: u32, len: u32) -> Vec<u8> {
        debug_assert!(offset + len <= self.geometry.block_bytes);
        let mut out = vec![0; len as usize];
        bits::read_bytes(&self.storage, self.layout.data(block, offset), &mut out);
        out
    }

    /// Overwrites data bytes of `block` starting at byte `offset`.
    pub fn set_block_data(&mut self, block: u32, offset: u32, data: &[u8]) {
        debug_assert!(offset as usize + data.len() <= self.geometry.block_bytes as usize);
        bits::write_bytes(&mut self.storage, self.layout.data(block, offset), data);
    }

    // ── Address reconstruction and lookup ─────────────────────

    /// Block-aligned address of the data currently stored in `block`.
    pub fn block_address(&self, block: u32) -> u32 {
        self.geometry.compose(AddressParts {
            tag: self.tag(block),
            index: self.set_of(block),
            offset: 0,
        })
    }

    /// Block identity of the data currently stored in `block`.
    pub fn block_id(&self, block: u32) -> BlockAddr {
        BlockAddr(self.block_address(block))
    }

    /// Returns the valid block holding `address`, if any. Has no side effects.
    pub fn lookup(&self, address: u32) -> Option<u32> {
        let tag = self.tag_of(address);
        self.set_blocks(address)
            .find(|&b| self.valid(b) && self.tag(b) == tag)
    }

    /// Coherence state of `address` in this cache (`Invalid` when absent).
    pub fn state_of(&self, address: u32) -> CoherenceState {
        self.lookup(address)
            .map_or(CoherenceState::Invalid, |b| self.state(b))
    }

    /// Marks the block holding `address` invalid, returning its number.
    pub fn invalidate(&mut self, address: u32) -> Option<u32> {
        let block = self.lookup(address)?;
        self.set_state(block, CoherenceState::Invalid);
        Some(block)
    }
}
