//! Cache statistics collection and reporting.
//!
//! This module tracks the access and hit counters of every cache. It provides:
//! 1. **Per-cache counters:** `CacheStats`, owned by each `Cache` and updated by the same
//!    operations that touch its storage (no process-wide state).
//! 2. **System report:** `SystemStats`, a snapshot of every cache in a system keyed by
//!    identifier, rendered as a text report or serialized to JSON.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;

use crate::common::CacheId;

/// Access and hit counters for a single cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of accesses serviced by the cache.
    pub accesses: u64,
    /// Number of those accesses that hit.
    pub hits: u64,
}

impl CacheStats {
    /// Records one access.
    #[inline]
    pub(crate) fn report_access(&mut self) {
        self.accesses += 1;
    }

    /// Records one hit.
    #[inline]
    pub(crate) fn report_hit(&mut self) {
        self.hits += 1;
    }

    /// Number of accesses that missed.
    pub const fn misses(&self) -> u64 {
        self.accesses.saturating_sub(self.hits)
    }

    /// Fraction of accesses that hit, or 0 when nothing was accessed.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }
}

/// Snapshot of the counters of every cache in a system.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SystemStats {
    /// Per-cache counters, ordered by identifier.
    pub caches: BTreeMap<CacheId, CacheStats>,
}

impl SystemStats {
    /// Sum of all per-cache counters.
    pub fn total(&self) -> CacheStats {
        self.caches
            .values()
            .fold(CacheStats::default(), |acc, s| CacheStats {
                accesses: acc.accesses + s.accesses,
                hits: acc.hits + s.hits,
            })
    }

    /// Renders the report as text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let total = self.total();
        let _ = writeln!(out, "==========================================================");
        let _ = writeln!(out, "CACHE SYSTEM STATISTICS");
        let _ = writeln!(out, "==========================================================");
        let _ = writeln!(out, "sys_accesses             {}", total.accesses);
        let _ = writeln!(out, "sys_hits                 {}", total.hits);
        let _ = writeln!(out, "sys_misses               {}", total.misses());
        let _ = writeln!(out, "sys_hit_rate             {:.4}", total.hit_rate());
        let _ = writeln!(out, "----------------------------------------------------------");
        for (id, s) in &self.caches {
            let _ = writeln!(
                out,
                "  {:<8} accesses {:<8} hits {:<8} misses {:<8} ({:.2}%)",
                id.to_string(),
                s.accesses,
                s.hits,
                s.misses(),
                s.hit_rate() * 100.0
            );
        }
        let _ = writeln!(out, "==========================================================");
        out
    }

    /// Prints the report to stdout.
    pub fn print(&self) {
        print!("{}", self.render());
    }
}
