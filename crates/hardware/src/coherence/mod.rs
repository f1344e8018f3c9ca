//! Multi-Cache Coherence.
//!
//! This module implements a system of caches kept coherent by a MESI
//! invalidation protocol over a shared backing memory. It provides:
//! 1. **Directory:** The "snooper" recording which caches hold which blocks.
//! 2. **System:** Construction, configuration, and read-only queries.
//! 3. **Protocol:** System reads and writes with cache-to-cache transfer and
//!    invalidation of other holders on write.
//! 4. **Accessors:** Byte/halfword/word/doubleword reads and writes.
//! 5. **Sharing:** A lock-protected handle for use across threads.
//!
//! After any system write completes, the writer is the only holder of the
//! written block and holds it `Modified`.

/// Width-sized system accessors.
pub mod access;

/// Block holder directory.
pub mod directory;

/// Read and write state machine.
pub mod protocol;

/// Lock-protected system handle.
pub mod shared;

/// System construction and queries.
pub mod system;

pub use directory::Directory;
pub use shared::SharedCacheSystem;
pub use system::{CacheSystem, CacheSystemBuilder};
