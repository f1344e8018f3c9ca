//! Bit-packed cache and MESI coherence simulator library.
//!
//! This crate models set-associative caches kept coherent by a directory-based
//! MESI protocol. It provides the following:
//! 1. **Common:** The MSB-first bit-field codec, address/width types, and errors.
//! 2. **Cache:** A single cache whose metadata and data live in one bit-packed buffer,
//!    with strict-rank LRU replacement.
//! 3. **Coherence:** The holder directory and the cache system running the protocol.
//! 4. **Memory:** In-memory and file-backed stores behind the caches.
//! 5. **Simulation:** Configuration, statistics, and trace replay.

/// Bit-field codec, address types, and errors.
pub mod common;
/// System configuration (defaults, JSON loading).
pub mod config;
/// Single-cache engine (geometry, layout, LRU, operations, dump).
pub mod cache;
/// Directory, cache system, and MESI protocol.
pub mod coherence;
/// Backing stores.
pub mod memory;
/// Memory-reference trace parsing and replay.
pub mod sim;
/// Access and hit statistics.
pub mod stats;

/// Root configuration type; use `SystemConfig::default()` or load from JSON.
pub use crate::config::SystemConfig;
/// Single cache; construct with `Cache::new`.
pub use crate::cache::{Cache, CacheGeometry, CoherenceState};
/// Coherent cache system; construct with `CacheSystem::builder` or `CacheSystem::from_config`.
pub use crate::coherence::{CacheSystem, CacheSystemBuilder, SharedCacheSystem};
/// Identifier and width types used at every call site.
pub use crate::common::{AccessError, CacheId, ConfigError, Width};
/// Backing store trait and implementations.
pub use crate::memory::{BackingStore, FileMemory, VecMemory};
