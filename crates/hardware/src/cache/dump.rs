//! Tabular debug dump of a cache.
//!
//! One row per block, in block order:
//!
//! ```text
//! ----------------------------------------------------
//! set | valid | dirty | shared | LRU | tag | data
//! 0 | 1 | 1 | 0 | 0 | 0x0 | 0xab000000
//! ...
//! ----------------------------------------------------
//! ```
//!
//! Built only from the public accessors, so it never disagrees with them.

use std::fmt;

use super::Cache;

const RULE: &str = "----------------------------------------------------";

impl fmt::Display for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "set | valid | dirty | shared | LRU | tag | data")?;
        for block in 0..self.num_blocks() {
            write!(
                f,
                "{} | {} | {} | {} | {} | {:#x} | 0x",
                self.set_of(block),
                u8::from(self.valid(block)),
                u8::from(self.dirty(block)),
                u8::from(self.shared(block)),
                self.lru(block),
                self.tag(block),
            )?;
            for byte in self.read_block(block) {
                write!(f, "{byte:02x}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{RULE}")
    }
}
