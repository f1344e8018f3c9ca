//! Error types.
//!
//! This module defines the error taxonomy of the simulator. It provides:
//! 1. **Configuration errors:** Invalid geometry or a missing backing store, raised at construction.
//! 2. **Access errors:** Per-request failures (alignment, width, range, unknown cache).
//! 3. **Memory errors:** Failures reported by a backing store.
//! 4. **Trace errors:** Malformed lines in a memory-reference trace.
//!
//! A rejected request never mutates cache, directory, or memory state.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::addr::{BlockAddr, CacheId};

/// Errors detected while building a cache or a cache system.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Cache geometry violates the power-of-two or capacity rules.
    #[error(
        "invalid cache geometry (ways={ways}, block_bytes={block_bytes}, total_bytes={total_bytes}): {reason}"
    )]
    InvalidGeometry {
        /// Requested associativity.
        ways: u32,
        /// Requested block size in bytes.
        block_bytes: u32,
        /// Requested capacity in bytes.
        total_bytes: u32,
        /// Which rule was broken.
        reason: &'static str,
    },

    /// A cache does not use the system-wide block size.
    #[error("{id} uses {found}-byte blocks but the system block size is {expected}")]
    BlockSizeMismatch {
        /// Offending cache.
        id: CacheId,
        /// System block size.
        expected: u32,
        /// Cache block size.
        found: u32,
    },

    /// Two caches were registered under the same identifier.
    #[error("duplicate cache identifier {0}")]
    DuplicateCache(CacheId),

    /// A cache system must contain at least one cache.
    #[error("cache system has no caches")]
    NoCaches,

    /// The named backing-memory file does not exist or cannot be opened.
    #[error("physical memory not found: {path}")]
    MissingBackingStore {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),
}

/// Errors reported by a backing store.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// The block lies (partly) outside the store.
    #[error("memory access at {address:#x} (+{len}) is out of range")]
    OutOfRange {
        /// First byte requested.
        address: u32,
        /// Requested length.
        len: usize,
    },

    /// The underlying file failed.
    #[error("memory I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Errors detected while servicing a single read or write request.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Address is not naturally aligned for the access width.
    #[error("misaligned {width}-byte access at {address:#x}")]
    Misaligned {
        /// Requested address.
        address: u32,
        /// Access width in bytes.
        width: u32,
    },

    /// Width is not one of 1, 2, 4 or 8 bytes.
    #[error("unsupported access width of {0} bytes")]
    InvalidWidth(u32),

    /// The access would run past the end of backing memory.
    #[error("{width}-byte access at {address:#x} is outside backing memory")]
    OutOfRange {
        /// Requested address.
        address: u32,
        /// Access width in bytes.
        width: u32,
    },

    /// The access does not fit in a single cache block.
    #[error("{width}-byte access at {address:#x} crosses a {block_bytes}-byte block boundary")]
    Straddle {
        /// Requested address.
        address: u32,
        /// Access width in bytes.
        width: u32,
        /// Block size in bytes.
        block_bytes: u32,
    },

    /// No cache with this identifier exists in the system.
    #[error("unknown cache {0}")]
    UnknownCache(CacheId),

    /// The directory lists a holder whose cache does not contain the block.
    #[error("directory lists {cache} as holder of block {block} but the cache does not hold it")]
    DirectoryMismatch {
        /// Block in question.
        block: BlockAddr,
        /// Cache named by the directory.
        cache: CacheId,
    },

    /// The backing store failed.
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// Errors detected while parsing a memory-reference trace.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("trace line {line}: {reason}")]
pub struct TraceError {
    /// One-based line number.
    pub line: usize,
    /// What was wrong with it.
    pub reason: String,
}
