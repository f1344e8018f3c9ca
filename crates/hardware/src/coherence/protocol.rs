//! MESI protocol engine.
//!
//! System reads and writes resolve the destination cache, consult the
//! directory, and move whole blocks between caches or from memory. Every
//! request is validated before any cache, directory or memory state changes.
//!
//! State transitions:
//!
//! | Event                          | Destination | Other holders         |
//! |--------------------------------|-------------|-----------------------|
//! | read hit                       | unchanged   | unchanged             |
//! | read miss, block held elsewhere| `Shared`    | source becomes `Shared` |
//! | read miss, block not cached    | `Exclusive` | none                  |
//! | write (hit or miss)            | `Modified`  | `Invalid`, unlisted   |
//!
//! A block evicted to make room is simply dropped from the directory for the
//! evicting cache; any remaining holder keeps its state.

use tracing::{debug, trace, warn};

use super::system::CacheSystem;
use crate::cache::{Cache, CoherenceState};
use crate::common::{AccessError, BlockAddr, CacheId};

/// Where a missing block came from.
enum Fill {
    Transfer(CacheId),
    Memory,
}

impl CacheSystem {
    /// Validates a raw `size`-byte request for cache `id` without side effects.
    fn check_raw(&self, id: CacheId, address: u32, size: u32) -> Result<&Cache, AccessError> {
        let cache = self
            .caches
            .get(&id)
            .ok_or(AccessError::UnknownCache(id))?;
        cache.check_fits(address, size)?;
        if u64::from(address) + u64::from(size) > self.memory.len() as u64 {
            return Err(AccessError::OutOfRange {
                address,
                width: size,
            });
        }
        Ok(cache)
    }

    /// Copies the whole block for `address` out of another holder, if any.
    fn snoop(&self, id: CacheId, address: u32) -> Result<Option<(CacheId, Vec<u8>)>, AccessError> {
        let block = self.block_of(address);
        let Some(src) = self.directory.any_holder_except(block, id) else {
            return Ok(None);
        };
        let found = self
            .caches
            .get(&src)
            .and_then(|cache| cache.lookup(address).map(|b| cache.read_block(b)));
        debug_assert!(found.is_some(), "directory lists {src} for {block} but it is absent");
        found
            .map(|data| Some((src, data)))
            .ok_or(AccessError::DirectoryMismatch { block, cache: src })
    }

    /// Brings the block for `address` into cache `id` on a miss.
    ///
    /// Installs the new block from another holder or from memory into
    /// `victim`, then drops the evicted block's directory entry and records
    /// `id` as a holder. If the victim's writeback fails, the cache and the
    /// directory are left as they were.
    fn fill(&mut self, id: CacheId, address: u32, victim: u32) -> Result<(), AccessError> {
        let block = self.block_of(address);
        let snooped = self.snoop(id, address)?;
        let (data, source) = match snooped {
            Some((src, data)) => (data, Fill::Transfer(src)),
            None => {
                let mut data = vec![0; self.block_bytes as usize];
                self.memory.read_block(block.val(), &mut data)?;
                (data, Fill::Memory)
            }
        };

        let dst = self
            .caches
            .get_mut(&id)
            .ok_or(AccessError::UnknownCache(id))?;
        let outgoing = dst.valid(victim).then(|| dst.block_id(victim));
        dst.write_whole_block(self.memory.as_mut(), address, victim, &data)?;
        if let Some(outgoing) = outgoing {
            debug!(cache = %id, block = %outgoing, "evict");
            let _ = self.directory.remove(outgoing, id);
        }

        match source {
            Fill::Transfer(src) => {
                debug!(from = %src, to = %id, %block, "cache-to-cache transfer");
                dst.set_state(victim, CoherenceState::Shared);
                if let Some(cache) = self.caches.get_mut(&src) {
                    if let Some(b) = cache.lookup(address) {
                        cache.set_state(b, CoherenceState::Shared);
                    }
                }
            }
            Fill::Memory => {
                debug!(cache = %id, %block, "fill from memory");
                dst.set_state(victim, CoherenceState::Exclusive);
            }
        }
        self.directory.add(block, id);
        Ok(())
    }

    /// Invalidates every holder of the block for `address` other than `id`.
    fn invalidate_others(&mut self, id: CacheId, address: u32) {
        let block = self.block_of(address);
        for other in self.directory.holders(block) {
            if other == id {
                continue;
            }
            let invalidated = self
                .caches
                .get_mut(&other)
                .and_then(|cache| cache.invalidate(address));
            if invalidated.is_none() {
                warn!(cache = %other, %block, "directory listed a holder without the block");
            }
            debug_assert!(
                invalidated.is_some(),
                "directory lists {other} for {block} but it is absent"
            );
            debug!(cache = %other, %block, "invalidate");
            let _ = self.directory.remove(block, other);
        }
    }

    /// Reads `size` bytes at `address` through cache `id`.
    ///
    /// A hit is served by the cache alone. On a miss the block comes from
    /// another holder when there is one (both end `Shared`), otherwise from
    /// memory (`Exclusive`).
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownCache`], [`AccessError::InvalidWidth`],
    /// [`AccessError::Straddle`] or [`AccessError::OutOfRange`] before touching
    /// any state, and propagates memory and directory failures.
    pub fn read(&mut self, address: u32, id: CacheId, size: u32) -> Result<Vec<u8>, AccessError> {
        let info = self.check_raw(id, address, size)?.find_eviction(address);
        if info.is_match {
            trace!(cache = %id, address, "system read hit");
            let dst = self
                .caches
                .get_mut(&id)
                .ok_or(AccessError::UnknownCache(id))?;
            return dst.read_data(self.memory.as_mut(), address, size);
        }

        debug!(cache = %id, address, "system read miss");
        let victim = info.block;
        self.fill(id, address, victim)?;
        let dst = self
            .caches
            .get_mut(&id)
            .ok_or(AccessError::UnknownCache(id))?;
        dst.stats_mut().report_access();
        Ok(dst.block_data(victim, dst.offset_of(address), size))
    }

    /// Writes `data` at `address` through cache `id`.
    ///
    /// Afterwards cache `id` holds the block `Modified` and is its only holder.
    ///
    /// # Errors
    ///
    /// Same conditions as [`CacheSystem::read`].
    pub fn write(&mut self, address: u32, id: CacheId, data: &[u8]) -> Result<(), AccessError> {
        let size = u32::try_from(data.len()).map_err(|_| AccessError::InvalidWidth(u32::MAX))?;
        let info = self.check_raw(id, address, size)?.find_eviction(address);
        if info.is_match {
            trace!(cache = %id, address, "system write hit");
            let dst = self
                .caches
                .get_mut(&id)
                .ok_or(AccessError::UnknownCache(id))?;
            dst.write_data(self.memory.as_mut(), address, data)?;
        } else {
            debug!(cache = %id, address, "system write miss");
            let victim = info.block;
            self.fill(id, address, victim)?;
            let dst = self
                .caches
                .get_mut(&id)
                .ok_or(AccessError::UnknownCache(id))?;
            dst.stats_mut().report_access();
            dst.store(victim, dst.offset_of(address), data);
        }

        self.invalidate_others(id, address);
        let block = self.block_of(address);
        self.directory.add(block, id);
        Ok(())
    }

    /// Whether `address` currently hits in cache `id`. Has no side effects.
    pub fn is_resident(&self, id: CacheId, address: u32) -> bool {
        self.caches
            .get(&id)
            .is_some_and(|cache| cache.lookup(address).is_some())
    }

    /// Block identities cache `id` holds according to the directory.
    pub fn blocks_held(&self, id: CacheId) -> Vec<BlockAddr> {
        self.directory
            .iter()
            .filter(|(_, holders)| holders.contains(&id))
            .map(|(block, _)| block)
            .collect()
    }
}
