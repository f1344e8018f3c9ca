//! # Block Layout Tests
//!
//! Verifies field positions inside the packed storage buffer and that every
//! field of one block can be written without disturbing its neighbours.

use cohesim_core::cache::{BlockLayout, CacheGeometry, CoherenceState};
use pretty_assertions::assert_eq;

use crate::common::harness::cache;

#[test]
fn two_way_sixteen_byte_layout() {
    // 3 flags + 1 LRU bit + 29 tag bits + 32 data bits = 65 bits per block.
    // 4 blocks = 260 bits, padded at the front by 4 bits to 33 bytes.
    let layout = BlockLayout::new(&CacheGeometry::new(2, 4, 16));
    assert_eq!(layout.block_bits(), 65);
    assert_eq!(layout.padding_bits(), 4);
    assert_eq!(layout.storage_bytes(), 33);
    assert_eq!(layout.block_start(1), 69);
    assert_eq!(layout.valid(1).offset, 69);
    assert_eq!(layout.dirty(1).offset, 70);
    assert_eq!(layout.shared(1).offset, 71);
    assert_eq!(layout.lru(1).offset, 72);
    assert_eq!(layout.tag(1).offset, 73);
    assert_eq!(layout.tag(1).len, 29);
    assert_eq!(layout.data(1, 0), 102);
    assert_eq!(layout.data(1, 3), 126);
    assert_eq!(layout.data_bits(), 32);
}

#[test]
fn byte_multiple_needs_no_padding() {
    // 3 + 0 + 29 + 64 = 96 bits.
    let layout = BlockLayout::new(&CacheGeometry::new(1, 8, 8));
    assert_eq!(layout.padding_bits(), 0);
    assert_eq!(layout.storage_bytes(), 12);
}

#[test]
fn fields_of_one_block_are_isolated() {
    let mut c = cache(2, 4, 16);
    let before: Vec<_> = [0, 2, 3]
        .iter()
        .map(|&b| (c.state(b), c.lru(b), c.tag(b), c.read_block(b)))
        .collect();

    c.set_state(1, CoherenceState::Modified);
    c.set_shared(1, true);
    c.set_tag(1, u32::MAX);
    c.set_block_data(1, 0, &[0xFF; 4]);

    let after: Vec<_> = [0, 2, 3]
        .iter()
        .map(|&b| (c.state(b), c.lru(b), c.tag(b), c.read_block(b)))
        .collect();
    assert_eq!(before, after);
    assert_eq!(c.tag(1), (1 << 29) - 1);
    assert_eq!(c.read_block(1), vec![0xFF; 4]);
    assert!(c.valid(1) && c.dirty(1) && c.shared(1));
}

#[test]
fn state_encoding_round_trips() {
    let mut c = cache(2, 4, 16);
    for state in [
        CoherenceState::Exclusive,
        CoherenceState::Modified,
        CoherenceState::Shared,
        CoherenceState::Invalid,
    ] {
        c.set_state(0, state);
        assert_eq!(c.state(0), state);
    }
    assert!(!c.valid(0) && !c.dirty(0) && !c.shared(0));
}

#[test]
fn shared_keeps_dirty_bit() {
    let mut c = cache(2, 4, 16);
    c.set_state(0, CoherenceState::Modified);
    c.set_state(0, CoherenceState::Shared);
    assert_eq!(c.state(0), CoherenceState::Shared);
    assert!(c.dirty(0));
}
