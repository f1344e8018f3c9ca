//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to build a cache
//! system. It provides:
//! 1. **Defaults:** Baseline block size, memory size, and cache geometry.
//! 2. **Structures:** System, memory, and per-cache configuration.
//! 3. **Loading:** JSON parsing from strings or files with typed errors.
//!
//! # Example
//!
//! ```
//! use cohesim_core::config::{MemoryConfig, SystemConfig};
//!
//! let json = r#"{
//!     "block_bytes": 4,
//!     "memory": { "Zeroed": { "size_bytes": 1024 } },
//!     "caches": [
//!         { "id": 1, "ways": 2, "total_bytes": 16 },
//!         { "id": 2, "ways": 1, "total_bytes": 32 }
//!     ]
//! }"#;
//!
//! let config = SystemConfig::from_json(json).unwrap();
//! assert_eq!(config.block_bytes, 4);
//! assert_eq!(config.caches.len(), 2);
//! assert_eq!(config.memory, MemoryConfig::Zeroed { size_bytes: 1024 });
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cache::CacheGeometry;
use crate::common::{CacheId, ConfigError};

/// Default configuration constants.
mod defaults {
    /// Default block size in bytes.
    pub const BLOCK_BYTES: u32 = 4;

    /// Default zero-filled memory size (64 KiB).
    pub const MEMORY_BYTES: usize = 64 * 1024;

    /// Default associativity.
    pub const WAYS: u32 = 2;

    /// Default cache capacity in bytes.
    pub const TOTAL_BYTES: u32 = 64;
}

/// Where the backing memory of a system comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub enum MemoryConfig {
    /// A zero-filled in-memory store of `size_bytes` bytes.
    Zeroed {
        /// Store size in bytes.
        #[serde(default = "MemoryConfig::default_size")]
        size_bytes: usize,
    },
    /// An existing memory image on disk.
    File {
        /// Path of the image.
        path: PathBuf,
    },
}

impl MemoryConfig {
    /// Returns the default zero-filled memory size.
    const fn default_size() -> usize {
        defaults::MEMORY_BYTES
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::Zeroed {
            size_bytes: defaults::MEMORY_BYTES,
        }
    }
}

/// One cache of a system. The block size is system-wide.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Identifier used to address the cache.
    pub id: CacheId,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: u32,

    /// Total cache size in bytes
    #[serde(default = "CacheConfig::default_total")]
    pub total_bytes: u32,
}

impl CacheConfig {
    /// Returns the default associativity.
    const fn default_ways() -> u32 {
        defaults::WAYS
    }

    /// Returns the default cache capacity.
    const fn default_total() -> u32 {
        defaults::TOTAL_BYTES
    }

    /// Geometry of this cache for a system with `block_bytes`-byte blocks.
    pub const fn geometry(&self, block_bytes: u32) -> CacheGeometry {
        CacheGeometry::new(self.ways, block_bytes, self.total_bytes)
    }
}

/// Root configuration of a cache system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SystemConfig {
    /// Block size shared by every cache, in bytes.
    #[serde(default = "SystemConfig::default_block")]
    pub block_bytes: u32,

    /// Backing memory.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Member caches.
    #[serde(default)]
    pub caches: Vec<CacheConfig>,
}

impl SystemConfig {
    /// Returns the default block size.
    const fn default_block() -> u32 {
        defaults::BLOCK_BYTES
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed input.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] on malformed input.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl Default for SystemConfig {
    /// Two default caches over a zero-filled memory.
    fn default() -> Self {
        Self {
            block_bytes: defaults::BLOCK_BYTES,
            memory: MemoryConfig::default(),
            caches: vec![
                CacheConfig {
                    id: CacheId(1),
                    ways: defaults::WAYS,
                    total_bytes: defaults::TOTAL_BYTES,
                },
                CacheConfig {
                    id: CacheId(2),
                    ways: defaults::WAYS,
                    total_bytes: defaults::TOTAL_BYTES,
                },
            ],
        }
    }
}
