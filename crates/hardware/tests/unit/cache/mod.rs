//! Single-cache engine tests.


/// Bit-packed block layout.
pub mod layout;

/// LRU ranking and victim selection.
pub mod lru;
