//! Coherence state encoding.
//!
//! A block's coherence state is not stored directly; it is derived from three
//! raw bits:
//!
//! | state     | valid | dirty | shared |
//! |-----------|-------|-------|--------|
//! | Invalid   | 0     | -     | -      |
//! | Exclusive | 1     | 0     | 0      |
//! | Modified  | 1     | 1     | 0      |
//! | Shared    | 1     | -     | 1      |
//!
//! A shared block may still be dirty: it was modified before a peer read it,
//! and the data reaches memory when this copy is evicted or flushed.

use std::fmt;

use serde::Serialize;

/// MESI coherence state of one block in one cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CoherenceState {
    /// Not present.
    Invalid,
    /// Present here and possibly in other caches.
    Shared,
    /// Present only here, clean.
    Exclusive,
    /// Present only here, dirty.
    Modified,
}

impl CoherenceState {
    /// Decodes the state from the raw block flags.
    pub const fn from_bits(valid: bool, dirty: bool, shared: bool) -> Self {
        match (valid, dirty, shared) {
            (false, _, _) => Self::Invalid,
            (true, _, true) => Self::Shared,
            (true, true, false) => Self::Modified,
            (true, false, false) => Self::Exclusive,
        }
    }

    /// Returns `true` for every state except `Invalid`.
    pub const fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Single-letter name used in dumps and trace output.
    pub const fn letter(self) -> char {
        match self {
            Self::Invalid => 'I',
            Self::Shared => 'S',
            Self::Exclusive => 'E',
            Self::Modified => 'M',
        }
    }
}

impl fmt::Display for CoherenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Invalid => "INVALID",
            Self::Shared => "SHARED",
            Self::Exclusive => "EXCLUSIVE",
            Self::Modified => "MODIFIED",
        };
        f.write_str(name)
    }
}
