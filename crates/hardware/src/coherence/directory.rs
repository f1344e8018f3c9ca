//! Coherence directory ("snooper").
//!
//! Records, for every block identity, which caches currently hold a copy.
//! Entries appear on the first fill of a block and disappear when the last
//! holder evicts or is invalidated. Holders are kept in identifier order, which
//! makes every query deterministic; the protocol itself relies only on whether
//! a holder exists and, for [`Directory::sole_holder`], on there being exactly one.

use std::collections::{BTreeMap, BTreeSet};

use crate::common::{BlockAddr, CacheId};

/// Map from block identity to the set of caches holding it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directory {
    entries: BTreeMap<BlockAddr, BTreeSet<CacheId>>,
}

impl Directory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `cache` holds `block`. Adding an existing holder is a no-op.
    pub fn add(&mut self, block: BlockAddr, cache: CacheId) {
        let _ = self.entries.entry(block).or_default().insert(cache);
    }

    /// Records that `cache` no longer holds `block`, dropping the entry once it
    /// has no holders. Returns whether `cache` was listed.
    pub fn remove(&mut self, block: BlockAddr, cache: CacheId) -> bool {
        let Some(holders) = self.entries.get_mut(&block) else {
            return false;
        };
        let removed = holders.remove(&cache);
        if holders.is_empty() {
            let _ = self.entries.remove(&block);
        }
        removed
    }

    /// Some cache holding `block`, if any.
    pub fn any_holder(&self, block: BlockAddr) -> Option<CacheId> {
        self.entries.get(&block)?.iter().next().copied()
    }

    /// Some cache other than `except` holding `block`, if any.
    pub fn any_holder_except(&self, block: BlockAddr, except: CacheId) -> Option<CacheId> {
        self.entries
            .get(&block)?
            .iter()
            .copied()
            .find(|&id| id != except)
    }

    /// The holder of `block` when there is exactly one.
    pub fn sole_holder(&self, block: BlockAddr) -> Option<CacheId> {
        let holders = self.entries.get(&block)?;
        if holders.len() == 1 {
            holders.iter().next().copied()
        } else {
            None
        }
    }

    /// Whether `cache` is listed as a holder of `block`.
    pub fn contains(&self, block: BlockAddr, cache: CacheId) -> bool {
        self.entries
            .get(&block)
            .is_some_and(|holders| holders.contains(&cache))
    }

    /// All holders of `block`, in identifier order.
    pub fn holders(&self, block: BlockAddr) -> Vec<CacheId> {
        self.entries
            .get(&block)
            .map(|holders| holders.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of blocks with at least one holder.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no block is held anywhere.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(block, holders)` pairs in block order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockAddr, &BTreeSet<CacheId>)> + '_ {
        self.entries.iter().map(|(&block, holders)| (block, holders))
    }
}
