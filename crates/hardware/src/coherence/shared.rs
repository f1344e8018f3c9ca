//! Thread-safe handle to a cache system.
//!
//! Every operation takes one exclusive lock for its whole duration, so system
//! reads and writes from different threads are serialized and never observed
//! half-done.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::system::CacheSystem;
use crate::cache::CoherenceState;
use crate::common::{AccessError, CacheId, Width};
use crate::stats::SystemStats;

/// Cloneable, lock-protected [`CacheSystem`].
#[derive(Clone, Debug)]
pub struct SharedCacheSystem {
    inner: Arc<Mutex<CacheSystem>>,
}

impl SharedCacheSystem {
    /// Wraps `system` for shared use.
    pub fn new(system: CacheSystem) -> Self {
        Self {
            inner: Arc::new(Mutex::new(system)),
        }
    }

    /// Locks the system, recovering the lock if a previous holder panicked.
    ///
    /// Requests rejected with an error leave the system unchanged, but a panic
    /// while the lock is held (inside a closure passed to [`Self::with`], or a
    /// failed debug assertion in the protocol) can leave that one operation
    /// partly applied. The system stays usable; its contents are not rolled back.
    pub fn lock(&self) -> MutexGuard<'_, CacheSystem> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the system.
    pub fn with<R>(&self, f: impl FnOnce(&mut CacheSystem) -> R) -> R {
        f(&mut self.lock())
    }

    /// Locked [`CacheSystem::read_width`].
    ///
    /// # Errors
    ///
    /// See [`CacheSystem::read_width`].
    pub fn read(&self, address: u32, id: CacheId, width: Width) -> Result<u64, AccessError> {
        self.lock().read_width(address, id, width)
    }

    /// Locked [`CacheSystem::write_width`].
    ///
    /// # Errors
    ///
    /// See [`CacheSystem::write_width`].
    pub fn write(
        &self,
        address: u32,
        id: CacheId,
        width: Width,
        value: u64,
    ) -> Result<(), AccessError> {
        self.lock().write_width(address, id, width, value)
    }

    /// Locked [`CacheSystem::state`].
    ///
    /// # Errors
    ///
    /// See [`CacheSystem::state`].
    pub fn state(&self, id: CacheId, address: u32) -> Result<CoherenceState, AccessError> {
        self.lock().state(id, address)
    }

    /// Locked [`CacheSystem::stats`].
    pub fn stats(&self) -> SystemStats {
        self.lock().stats()
    }
}

impl From<CacheSystem> for SharedCacheSystem {
    fn from(system: CacheSystem) -> Self {
        Self::new(system)
    }
}
