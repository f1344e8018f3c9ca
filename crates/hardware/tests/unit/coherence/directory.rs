//! # Directory Tests
//!
//! Verifies holder bookkeeping: idempotent adds, entry removal with the last
//! holder, and the existence and cardinality queries the protocol relies on.

use cohesim_core::coherence::Directory;
use cohesim_core::common::{BlockAddr, CacheId};
use pretty_assertions::assert_eq;

const B: BlockAddr = BlockAddr(0x100);

#[test]
fn starts_empty() {
    let dir = Directory::new();
    assert!(dir.is_empty());
    assert_eq!(dir.any_holder(B), None);
    assert_eq!(dir.sole_holder(B), None);
    assert!(dir.holders(B).is_empty());
}

#[test]
fn adding_twice_is_idempotent() {
    let mut dir = Directory::new();
    dir.add(B, CacheId(1));
    dir.add(B, CacheId(1));
    assert_eq!(dir.holders(B), vec![CacheId(1)]);
    assert_eq!(dir.sole_holder(B), Some(CacheId(1)));
}

#[test]
fn sole_holder_requires_exactly_one() {
    let mut dir = Directory::new();
    dir.add(B, CacheId(2));
    dir.add(B, CacheId(1));
    assert_eq!(dir.sole_holder(B), None);
    assert!(dir.any_holder(B).is_some());
    assert_eq!(dir.holders(B), vec![CacheId(1), CacheId(2)]);
}

#[test]
fn holder_except_skips_the_asker() {
    let mut dir = Directory::new();
    dir.add(B, CacheId(1));
    assert_eq!(dir.any_holder_except(B, CacheId(1)), None);
    dir.add(B, CacheId(2));
    assert_eq!(dir.any_holder_except(B, CacheId(1)), Some(CacheId(2)));
}

#[test]
fn blocks_are_independent() {
    let mut dir = Directory::new();
    dir.add(B, CacheId(1));
    dir.add(BlockAddr(0x104), CacheId(2));
    assert_eq!(dir.len(), 2);
    assert!(dir.contains(B, CacheId(1)));
    assert!(!dir.contains(B, CacheId(2)));

    assert!(dir.remove(B, CacheId(1)));
    assert!(!dir.remove(B, CacheId(1)));
    assert_eq!(dir.len(), 1);
    assert_eq!(
        dir.iter().map(|(b, h)| (b, h.len())).collect::<Vec<_>>(),
        vec![(BlockAddr(0x104), 1)]
    );
}
