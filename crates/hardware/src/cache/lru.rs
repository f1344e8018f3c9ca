//! Least Recently Used (LRU) Replacement.
//!
//! Every block carries a rank in `[0, ways)`; rank 0 is the most recently used
//! block of its set and rank `ways - 1` the least. Ranks within a set are always
//! a permutation of `0..ways`.
//!
//! # Victim selection
//!
//! The set is scanned in block-number order. A valid block with a matching tag
//! is a hit. Otherwise the victim is the block with the strictly greatest rank
//! seen so far, so ties resolve to the lowest block number.
//!
//! # Performance
//!
//! - `find_eviction()`: O(W) field reads.
//! - `update_lru()`: O(W) field reads and writes.

use super::Cache;

/// Result of scanning a set for an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvictionInfo {
    /// Matching block on a hit, victim block on a miss.
    pub block: u32,
    /// Current LRU rank of `block`.
    pub rank: u32,
    /// Whether `block` already holds the address.
    pub is_match: bool,
}

impl Cache {
    /// Scans the set of `address` for a matching block or, failing that, the
    /// least recently used one.
    pub fn find_eviction(&self, address: u32) -> EvictionInfo {
        let tag = self.tag_of(address);
        let blocks = self.set_blocks(address);
        let mut victim = EvictionInfo {
            block: blocks.start,
            rank: self.lru(blocks.start),
            is_match: false,
        };
        for block in blocks {
            let rank = self.lru(block);
            if self.valid(block) && self.tag(block) == tag {
                return EvictionInfo {
                    block,
                    rank,
                    is_match: true,
                };
            }
            if rank > victim.rank {
                victim.block = block;
                victim.rank = rank;
            }
        }
        victim
    }

    /// Promotes `block` to rank 0.
    ///
    /// `prior_rank` is the rank the block held before this access. Blocks of the
    /// same set ranked below it move down by one; blocks ranked above it keep
    /// their rank.
    pub fn update_lru(&mut self, block: u32, prior_rank: u32) {
        let first = self.set_of(block) * self.ways();
        for other in first..first + self.ways() {
            if other == block {
                self.set_lru(other, 0);
                continue;
            }
            let rank = self.lru(other);
            if rank < prior_rank {
                self.set_lru(other, rank + 1);
            }
        }
    }

    /// Ranks of every block of `set`, in way order.
    pub fn set_ranks(&self, set: u32) -> Vec<u32> {
        let first = set * self.ways();
        (first..first + self.ways()).map(|b| self.lru(b)).collect()
    }
}
