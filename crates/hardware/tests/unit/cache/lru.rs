//! # LRU Replacement Tests
//!
//! Verifies the strict-rank LRU: initial ranks, promotion on access, victim
//! selection with lowest-block tie-breaking, and the per-set permutation
//! invariant under arbitrary access sequences.

use cohesim_core::memory::VecMemory;
use proptest::prelude::*;

use crate::common::harness::{assert_lru_permutation, cache};

// ══════════════════════════════════════════════════════════
// 1. Initial state
// ══════════════════════════════════════════════════════════

#[test]
fn initial_ranks_are_reverse_way_order() {
    let c = cache(4, 4, 16);
    assert_eq!(c.set_ranks(0), vec![3, 2, 1, 0]);

    let c = cache(2, 4, 16);
    assert_eq!(c.set_ranks(0), vec![1, 0]);
    assert_eq!(c.set_ranks(1), vec![1, 0]);
}

/// Cold fills land in way order because way 0 starts least recently used.
#[test]
fn cold_fills_proceed_in_way_order() {
    let mut c = cache(4, 4, 16);
    let mut mem = VecMemory::new(256);
    for (way, address) in [0u32, 4, 8, 12].into_iter().enumerate() {
        let _ = c.read_byte(&mut mem, address).unwrap();
        assert_eq!(c.lookup(address), Some(way as u32));
    }
    assert_eq!(c.set_ranks(0), vec![3, 2, 1, 0]);
}

// ══════════════════════════════════════════════════════════
// 2. Promotion and victim choice
// ══════════════════════════════════════════════════════════

#[test]
fn reaccess_promotes_and_shifts_younger_blocks() {
    let mut c = cache(4, 4, 16);
    let mut mem = VecMemory::new(256);
    for address in [0, 4, 8, 12] {
        let _ = c.read_byte(&mut mem, address).unwrap();
    }
    // Block 0 is least recently used; touching it moves everyone else down.
    let _ = c.read_byte(&mut mem, 0).unwrap();
    assert_eq!(c.set_ranks(0), vec![0, 3, 2, 1]);

    let info = c.find_eviction(16);
    assert!(!info.is_match);
    assert_eq!(info.block, 1);
    assert_eq!(info.rank, 3);
}

#[test]
fn hit_reports_current_rank() {
    let mut c = cache(2, 4, 16);
    let mut mem = VecMemory::new(64);
    let _ = c.read_byte(&mut mem, 0).unwrap();
    let _ = c.read_byte(&mut mem, 8).unwrap();

    let info = c.find_eviction(0);
    assert!(info.is_match);
    assert_eq!(info.block, 0);
    assert_eq!(info.rank, 1);
}

#[test]
fn promoting_the_mru_block_changes_nothing() {
    let mut c = cache(4, 4, 16);
    c.update_lru(3, 0);
    assert_eq!(c.set_ranks(0), vec![3, 2, 1, 0]);
}

#[test]
fn ties_resolve_to_lowest_block() {
    let mut c = cache(2, 4, 16);
    c.set_lru(2, 0);
    c.set_lru(3, 0);
    assert_eq!(c.find_eviction(4).block, 2);

    c.set_lru(3, 1);
    assert_eq!(c.find_eviction(4).block, 3);
}

// ══════════════════════════════════════════════════════════
// 3. Properties
// ══════════════════════════════════════════════════════════

fn access_sequence() -> impl Strategy<Value = Vec<(bool, u32)>> {
    prop::collection::vec((any::<bool>(), 0u32..256), 1..64)
}

proptest! {
    /// Ranks in every set stay a permutation of `0..ways` after every access.
    #[test]
    fn ranks_stay_a_permutation(ops in access_sequence()) {
        let mut c = cache(4, 4, 64);
        let mut mem = VecMemory::new(256);
        for (write, address) in ops {
            if write {
                c.write_byte(&mut mem, address, address as u8).unwrap();
            } else {
                let _ = c.read_byte(&mut mem, address).unwrap();
            }
            assert_lru_permutation(&c);
        }
    }

    /// The same access sequence always picks the same victims.
    #[test]
    fn victims_are_reproducible(ops in access_sequence()) {
        let run = |ops: &[(bool, u32)]| {
            let mut c = cache(2, 4, 32);
            let mut mem = VecMemory::new(256);
            ops.iter()
                .map(|&(write, address)| {
                    let info = c.find_eviction(address);
                    if write {
                        c.write_byte(&mut mem, address, 1).unwrap();
                    } else {
                        let _ = c.read_byte(&mut mem, address).unwrap();
                    }
                    info
                })
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(run(&ops), run(&ops));
    }
}
