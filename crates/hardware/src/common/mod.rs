//! Common utilities and types used throughout the simulator.
//!
//! This module provides the building blocks shared by the cache engine and the
//! coherence layer. It includes:
//! 1. **Bit-Field Codec:** MSB-first packing of arbitrary fields into byte buffers.
//! 2. **Address Types:** Block identities, cache identifiers, and access widths.
//! 3. **Error Handling:** Configuration, request, and memory error types.

/// MSB-first bit-field reads and writes over packed byte buffers.
pub mod bits;

/// Block addresses, cache identifiers, and access widths.
pub mod addr;

/// Error types.
pub mod error;

pub use addr::{BlockAddr, CacheId, Width};
pub use bits::BitField;
pub use error::{AccessError, ConfigError, MemoryError, TraceError};
