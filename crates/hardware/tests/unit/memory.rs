//! # Backing Store Tests
//!
//! Verifies block reads and writes, range checking, and that the file-backed
//! store reads from and writes through to its image.

use std::fs;
use std::io::Write;

use cohesim_core::common::{ConfigError, MemoryError};
use cohesim_core::memory::{BackingStore, FileMemory, VecMemory};
use tempfile::NamedTempFile;

// ══════════════════════════════════════════════════════════
// 1. In-memory store
// ══════════════════════════════════════════════════════════

#[test]
fn vec_memory_starts_zeroed() {
    let mut mem = VecMemory::new(32);
    let mut buf = [0xFF; 8];
    mem.read_block(8, &mut buf).unwrap();
    assert_eq!(buf, [0; 8]);
    assert_eq!(mem.len(), 32);
    assert!(!mem.is_empty());
}

#[test]
fn vec_memory_block_round_trip() {
    let mut mem = VecMemory::from_bytes(vec![0; 16]);
    mem.write_block(4, &[1, 2, 3, 4]).unwrap();
    assert_eq!(&mem.as_slice()[4..8], &[1, 2, 3, 4]);
    mem.write_u8(0, 9);
    assert_eq!(mem.read_u8(0), 9);
}

#[test]
fn vec_memory_rejects_out_of_range_blocks() {
    let mut mem = VecMemory::new(16);
    let mut buf = [0u8; 4];
    assert!(matches!(
        mem.read_block(14, &mut buf),
        Err(MemoryError::OutOfRange { address: 14, len: 4 })
    ));
    assert!(mem.write_block(u32::MAX, &[0]).is_err());
    assert!(VecMemory::new(0).is_empty());
}

// ══════════════════════════════════════════════════════════
// 2. File-backed store
// ══════════════════════════════════════════════════════════

fn image(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn file_memory_reads_the_image() {
    let file = image(&[10, 11, 12, 13, 14, 15, 16, 17]);
    let mut mem = FileMemory::open(file.path()).unwrap();
    assert_eq!(mem.len(), 8);
    assert_eq!(mem.path(), file.path());

    let mut buf = [0u8; 4];
    mem.read_block(4, &mut buf).unwrap();
    assert_eq!(buf, [14, 15, 16, 17]);
}

#[test]
fn file_memory_writes_through() {
    let file = image(&[0; 8]);
    let mut mem = FileMemory::open(file.path()).unwrap();
    mem.write_block(2, &[0xAA, 0xBB]).unwrap();
    assert_eq!(fs::read(file.path()).unwrap(), vec![0, 0, 0xAA, 0xBB, 0, 0, 0, 0]);
}

#[test]
fn file_memory_is_range_checked() {
    let file = image(&[0; 8]);
    let mut mem = FileMemory::open(file.path()).unwrap();
    let mut buf = [0u8; 4];
    assert!(matches!(
        mem.read_block(6, &mut buf),
        Err(MemoryError::OutOfRange { .. })
    ));
    // A rejected write must not grow the image.
    assert!(mem.write_block(8, &[1]).is_err());
    assert_eq!(fs::metadata(file.path()).unwrap().len(), 8);
}

#[test]
fn missing_image_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = FileMemory::open(dir.path().join("ram.img")).unwrap_err();
    match err {
        ConfigError::MissingBackingStore { path, .. } => assert!(path.ends_with("ram.img")),
        other => panic!("expected MissingBackingStore, got {other:?}"),
    }
}
