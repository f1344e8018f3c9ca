//! # Unit Components
//!
//! This module serves as the central hub for the tests of every component of
//! the simulator, from the bit-field codec up to trace replay.


/// Unit tests for the single-cache engine.
///
/// This module aggregates tests for:
/// - Geometry validation and address decomposition.
/// - The bit-packed block layout.
/// - LRU ranking and victim selection.
/// - Fills, writebacks, width accessors, and the debug dump.
pub mod cache;


/// Unit tests for JSON configuration loading.
pub mod config;

/// Unit tests for the backing stores.
pub mod memory;

/// Unit tests for statistics collection and reporting.
pub mod stats;

/// Unit tests for trace parsing and replay.
pub mod trace;
