//! # Shared System Tests
//!
//! Verifies that a lock-protected system serializes operations issued from
//! several threads and ends in a coherent state.

use std::thread;

use cohesim_core::cache::CoherenceState;
use cohesim_core::coherence::SharedCacheSystem;
use cohesim_core::common::{CacheId, Width};

use crate::common::harness::system;

#[test]
fn concurrent_writers_leave_a_coherent_system() {
    let ids: Vec<CacheId> = (1..=4).map(CacheId).collect();
    let shapes: Vec<_> = ids.iter().map(|&id| (id, 2, 32)).collect();
    let shared = SharedCacheSystem::new(system(4, &shapes));

    let handles: Vec<_> = ids
        .iter()
        .map(|&id| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..16u32 {
                    let address = u32::from(id.0) * 0x40 + i * 4;
                    shared.write(address, id, Width::Word, u64::from(address)).unwrap();
                    // Everyone also hammers a common word.
                    shared.write(0x200, id, Width::Word, u64::from(id.0)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let reader = CacheId(1);
    for &id in &ids {
        for i in 0..16u32 {
            let address = u32::from(id.0) * 0x40 + i * 4;
            assert_eq!(shared.read(address, reader, Width::Word).unwrap(), u64::from(address));
        }
    }

    let last = shared.read(0x200, reader, Width::Word).unwrap();
    assert!((1..=4).contains(&last));
    shared.with(|sys| {
        let holders = sys.holders(0x200);
        assert!(!holders.is_empty());
        for holder in holders {
            assert_ne!(sys.state(holder, 0x200).unwrap(), CoherenceState::Invalid);
        }
    });
    assert!(shared.stats().total().accesses > 0);
    assert!(shared.state(reader, 0x200).unwrap().is_valid());
}
