//! # Statistics Tests
//!
//! Verifies the derived counters, system-wide aggregation, the text report,
//! and JSON serialization.

use std::collections::BTreeMap;

use cohesim_core::common::CacheId;
use cohesim_core::stats::{CacheStats, SystemStats};

use crate::common::harness::{C1, C2, two_caches};

fn sample() -> SystemStats {
    let mut caches = BTreeMap::new();
    let _ = caches.insert(CacheId(1), CacheStats { accesses: 10, hits: 7 });
    let _ = caches.insert(CacheId(2), CacheStats { accesses: 6, hits: 1 });
    SystemStats { caches }
}

#[test]
fn derived_counters() {
    let s = CacheStats { accesses: 8, hits: 6 };
    assert_eq!(s.misses(), 2);
    assert!((s.hit_rate() - 0.75).abs() < f64::EPSILON);
    assert!(CacheStats::default().hit_rate().abs() < f64::EPSILON);
}

#[test]
fn totals_sum_every_cache() {
    let total = sample().total();
    assert_eq!(total, CacheStats { accesses: 16, hits: 8 });
}

#[test]
fn report_lists_system_and_per_cache_lines() {
    let report = sample().render();
    assert!(report.contains("CACHE SYSTEM STATISTICS"));
    assert!(report.contains("sys_accesses             16"));
    assert!(report.contains("sys_hit_rate             0.5000"));
    assert!(report.contains("cache1"));
    assert!(report.contains("cache2"));
}

#[test]
fn serializes_keyed_by_cache_id() {
    let json = serde_json::to_value(sample()).unwrap();
    assert_eq!(json["caches"]["1"]["accesses"], 10);
    assert_eq!(json["caches"]["2"]["hits"], 1);
}

#[test]
fn system_snapshot_tracks_each_cache() {
    let mut sys = two_caches();
    let _ = sys.read_word(0, C1).unwrap();
    let _ = sys.read_word(0, C1).unwrap();
    let _ = sys.read_word(0, C2).unwrap();

    let stats = sys.stats();
    assert_eq!(stats.caches[&C1], CacheStats { accesses: 2, hits: 1 });
    assert_eq!(stats.caches[&C2], CacheStats { accesses: 1, hits: 0 });
}
