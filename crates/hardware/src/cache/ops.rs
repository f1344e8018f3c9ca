//! Single-cache operations against backing memory.
//!
//! These are the primitives the width accessors and the coherence layer build
//! on: evictions with writeback, fills from memory, in-block reads and writes,
//! whole-block installs for cache-to-cache transfer, and flushing.
//!
//! Reads and writes here never span blocks; an access must fit inside the
//! block its address maps to.

use tracing::{debug, trace};

use super::{Cache, CoherenceState};
use crate::common::{AccessError, BlockAddr, MemoryError};
use crate::memory::BackingStore;

impl Cache {
    /// Rejects empty accesses and accesses that run past the end of the block.
    pub(crate) fn check_fits(&self, address: u32, size: u32) -> Result<(), AccessError> {
        if size == 0 {
            return Err(AccessError::InvalidWidth(0));
        }
        if self.offset_of(address) + size > self.block_bytes() {
            return Err(AccessError::Straddle {
                address,
                width: size,
                block_bytes: self.block_bytes(),
            });
        }
        Ok(())
    }

    /// Writes `block` back to memory if it is valid and dirty.
    ///
    /// The block's own bits are left untouched; the caller overwrites them.
    ///
    /// # Errors
    ///
    /// Propagates backing-store failures.
    pub fn evict(&mut self, block: u32, mem: &mut dyn BackingStore) -> Result<(), MemoryError> {
        if self.valid(block) && self.dirty(block) {
            let address = self.block_address(block);
            debug!(block, address = %BlockAddr(address), "writeback");
            mem.write_block(address, &self.read_block(block))?;
        }
        Ok(())
    }

    /// Fetches the block containing `address` from memory into `victim`,
    /// evicting whatever was there. The new block is clean and exclusive; its
    /// LRU rank is not touched.
    fn fill_from_memory(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        victim: u32,
    ) -> Result<(), MemoryError> {
        let base = address - self.offset_of(address);
        let mut data = vec![0; self.block_bytes() as usize];
        mem.read_block(base, &mut data)?;
        self.evict(victim, mem)?;
        debug!(block = victim, address = %BlockAddr(base), "fill from memory");
        self.set_tag(victim, self.tag_of(address));
        self.set_block_data(victim, 0, &data);
        self.set_state(victim, CoherenceState::Exclusive);
        Ok(())
    }

    /// Reads `size` bytes at `address`, filling the block from memory on a miss.
    ///
    /// Counts one access (and one hit when the block was present) once the
    /// block is in place, and promotes it to most recently used. A failed fill
    /// leaves the counters alone.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Straddle`] or [`AccessError::InvalidWidth`] if the
    /// request does not fit in one block, and propagates memory failures.
    pub fn read_data(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        size: u32,
    ) -> Result<Vec<u8>, AccessError> {
        self.check_fits(address, size)?;
        let info = self.find_eviction(address);
        if info.is_match {
            trace!(address, block = info.block, "read hit");
        } else {
            debug!(address, block = info.block, "read miss");
            self.fill_from_memory(mem, address, info.block)?;
        }
        self.record_access(info.is_match);
        let data = self.block_data(info.block, self.offset_of(address), size);
        self.update_lru(info.block, info.rank);
        Ok(data)
    }

    /// Writes `data` at `address`, filling the block from memory on a miss.
    ///
    /// The block ends up valid, dirty and not shared, and becomes most recently
    /// used.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Cache::read_data`].
    pub fn write_data(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        data: &[u8],
    ) -> Result<(), AccessError> {
        self.check_fits(address, data.len() as u32)?;
        let info = self.find_eviction(address);
        if info.is_match {
            trace!(address, block = info.block, "write hit");
        } else {
            debug!(address, block = info.block, "write miss");
            self.fill_from_memory(mem, address, info.block)?;
        }
        self.record_access(info.is_match);
        self.store(info.block, self.offset_of(address), data);
        self.update_lru(info.block, info.rank);
        Ok(())
    }

    /// Counts one serviced access, and a hit when the block was already present.
    fn record_access(&mut self, hit: bool) {
        let stats = self.stats_mut();
        stats.report_access();
        if hit {
            stats.report_hit();
        }
    }

    /// Overwrites bytes of a resident block and marks it modified.
    pub(crate) fn store(&mut self, block: u32, offset: u32, data: &[u8]) {
        self.set_block_data(block, offset, data);
        self.set_state(block, CoherenceState::Modified);
    }

    /// Installs a whole block of `data` for `address` into `victim` without
    /// reading memory. Used for cache-to-cache transfers.
    ///
    /// The victim is evicted first (with writeback if dirty). The new block is
    /// valid and clean, its shared bit is left for the caller to set, and it is
    /// promoted using the victim's prior rank.
    ///
    /// # Errors
    ///
    /// Propagates writeback failures.
    pub fn write_whole_block(
        &mut self,
        mem: &mut dyn BackingStore,
        address: u32,
        victim: u32,
        data: &[u8],
    ) -> Result<(), MemoryError> {
        debug_assert_eq!(data.len(), self.block_bytes() as usize);
        let prior_rank = self.lru(victim);
        self.evict(victim, mem)?;
        self.set_valid(victim, true);
        self.set_dirty(victim, false);
        self.set_tag(victim, self.tag_of(address));
        self.set_block_data(victim, 0, data);
        self.update_lru(victim, prior_rank);
        Ok(())
    }

    /// Writes every valid dirty block back to memory and marks it clean.
    ///
    /// Modified blocks become exclusive; dirty shared blocks stay shared.
    ///
    /// # Returns
    ///
    /// The number of blocks written back.
    ///
    /// # Errors
    ///
    /// Propagates backing-store failures; blocks written before the failure stay clean.
    pub fn flush(&mut self, mem: &mut dyn BackingStore) -> Result<u32, MemoryError> {
        let mut written = 0;
        for block in 0..self.num_blocks() {
            if self.valid(block) && self.dirty(block) {
                self.evict(block, mem)?;
                self.set_dirty(block, false);
                written += 1;
            }
        }
        Ok(written)
    }
}
