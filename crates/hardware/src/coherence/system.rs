//! Cache system construction and queries.
//!
//! A `CacheSystem` owns a set of caches keyed by identifier, the backing memory
//! they share, and the directory that tracks which of them hold which blocks.
//! Caches are fixed at construction; use [`CacheSystemBuilder`] or
//! [`CacheSystem::from_config`].

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info};

use super::directory::Directory;
use crate::cache::{Cache, CacheGeometry, CoherenceState};
use crate::common::{AccessError, BlockAddr, CacheId, ConfigError, MemoryError};
use crate::config::{MemoryConfig, SystemConfig};
use crate::memory::{BackingStore, FileMemory, VecMemory};
use crate::stats::SystemStats;

/// Caches sharing one backing memory under a MESI invalidation protocol.
pub struct CacheSystem {
    pub(super) block_bytes: u32,
    pub(super) caches: BTreeMap<CacheId, Cache>,
    pub(super) directory: Directory,
    pub(super) memory: Box<dyn BackingStore>,
}

impl fmt::Debug for CacheSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSystem")
            .field("block_bytes", &self.block_bytes)
            .field("caches", &self.caches.keys().collect::<Vec<_>>())
            .field("directory", &self.directory)
            .field("memory_bytes", &self.memory.len())
            .finish()
    }
}

/// Incremental builder for a [`CacheSystem`].
#[derive(Debug, Clone)]
pub struct CacheSystemBuilder {
    block_bytes: u32,
    caches: Vec<(CacheId, CacheGeometry)>,
}

impl CacheSystemBuilder {
    /// Starts a system whose caches all use `block_bytes`-byte blocks.
    pub const fn new(block_bytes: u32) -> Self {
        Self {
            block_bytes,
            caches: Vec::new(),
        }
    }

    /// Adds a cache with the given associativity and capacity.
    #[must_use]
    pub fn cache(mut self, id: CacheId, ways: u32, total_bytes: u32) -> Self {
        self.caches
            .push((id, CacheGeometry::new(ways, self.block_bytes, total_bytes)));
        self
    }

    /// Adds a cache with an explicit geometry, which must use the system block size.
    #[must_use]
    pub fn cache_with_geometry(mut self, id: CacheId, geometry: CacheGeometry) -> Self {
        self.caches.push((id, geometry));
        self
    }

    /// Builds the system over `memory`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoCaches`], [`ConfigError::DuplicateCache`],
    /// [`ConfigError::BlockSizeMismatch`] or [`ConfigError::InvalidGeometry`].
    pub fn build(self, memory: Box<dyn BackingStore>) -> Result<CacheSystem, ConfigError> {
        if self.caches.is_empty() {
            return Err(ConfigError::NoCaches);
        }
        let mut caches = BTreeMap::new();
        for (id, geometry) in self.caches {
            if geometry.block_bytes != self.block_bytes {
                return Err(ConfigError::BlockSizeMismatch {
                    id,
                    expected: self.block_bytes,
                    found: geometry.block_bytes,
                });
            }
            if caches.contains_key(&id) {
                return Err(ConfigError::DuplicateCache(id));
            }
            let _ = caches.insert(id, Cache::new(geometry)?);
        }
        info!(
            caches = caches.len(),
            block_bytes = self.block_bytes,
            memory_bytes = memory.len(),
            "cache system ready"
        );
        Ok(CacheSystem {
            block_bytes: self.block_bytes,
            caches,
            directory: Directory::new(),
            memory,
        })
    }
}

impl CacheSystem {
    /// Starts a builder; see [`CacheSystemBuilder`].
    pub const fn builder(block_bytes: u32) -> CacheSystemBuilder {
        CacheSystemBuilder::new(block_bytes)
    }

    /// Builds a system from a parsed configuration, opening its backing memory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingBackingStore`] when the memory image cannot
    /// be opened, or any error from [`CacheSystemBuilder::build`].
    pub fn from_config(config: &SystemConfig) -> Result<Self, ConfigError> {
        let memory: Box<dyn BackingStore> = match &config.memory {
            MemoryConfig::Zeroed { size_bytes } => Box::new(VecMemory::new(*size_bytes)),
            MemoryConfig::File { path } => Box::new(FileMemory::open(path)?),
        };
        config
            .caches
            .iter()
            .fold(Self::builder(config.block_bytes), |b, c| {
                b.cache_with_geometry(c.id, c.geometry(config.block_bytes))
            })
            .build(memory)
    }

    /// System-wide block size in bytes.
    pub const fn block_bytes(&self) -> u32 {
        self.block_bytes
    }

    /// Identifiers of all caches, in order.
    pub fn cache_ids(&self) -> impl Iterator<Item = CacheId> + '_ {
        self.caches.keys().copied()
    }

    /// The cache named `id`.
    pub fn cache(&self, id: CacheId) -> Option<&Cache> {
        self.caches.get(&id)
    }

    /// The holder directory.
    pub const fn directory(&self) -> &Directory {
        &self.directory
    }

    /// The shared backing memory.
    pub fn memory(&self) -> &dyn BackingStore {
        self.memory.as_ref()
    }

    /// Block identity of `address` at the system block size.
    pub const fn block_of(&self, address: u32) -> BlockAddr {
        BlockAddr::containing(address, self.block_bytes)
    }

    /// Coherence state of `address` in cache `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownCache`] if no such cache exists.
    pub fn state(&self, id: CacheId, address: u32) -> Result<CoherenceState, AccessError> {
        self.caches
            .get(&id)
            .map(|cache| cache.state_of(address))
            .ok_or(AccessError::UnknownCache(id))
    }

    /// Caches the directory lists as holding `address`.
    pub fn holders(&self, address: u32) -> Vec<CacheId> {
        self.directory.holders(self.block_of(address))
    }

    /// Snapshot of every cache's counters.
    pub fn stats(&self) -> SystemStats {
        SystemStats {
            caches: self
                .caches
                .iter()
                .map(|(&id, cache)| (id, *cache.stats()))
                .collect(),
        }
    }

    /// Writes back every dirty block of cache `id`.
    ///
    /// Directory membership is unchanged: flushed blocks stay resident and clean.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::UnknownCache`] or a memory failure.
    pub fn flush(&mut self, id: CacheId) -> Result<u32, AccessError> {
        let cache = self
            .caches
            .get_mut(&id)
            .ok_or(AccessError::UnknownCache(id))?;
        let written = cache.flush(self.memory.as_mut())?;
        debug!(cache = %id, written, "flush");
        Ok(written)
    }

    /// Writes back every dirty block of every cache.
    ///
    /// # Errors
    ///
    /// Propagates the first memory failure.
    pub fn flush_all(&mut self) -> Result<u32, MemoryError> {
        let mut written = 0;
        for cache in self.caches.values_mut() {
            written += cache.flush(self.memory.as_mut())?;
        }
        Ok(written)
    }
}
