//! # Configuration Tests
//!
//! Tests for configuration defaults, JSON deserialization with partial input,
//! file loading, and error reporting.

use std::io::Write;
use std::path::PathBuf;

use cohesim_core::common::{CacheId, ConfigError};
use cohesim_core::config::{CacheConfig, MemoryConfig, SystemConfig};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

#[test]
fn test_system_config_default() {
    let config = SystemConfig::default();
    assert_eq!(config.block_bytes, 4);
    assert_eq!(config.memory, MemoryConfig::Zeroed { size_bytes: 64 * 1024 });
    assert_eq!(
        config.caches.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![CacheId(1), CacheId(2)]
    );
    assert!(config.caches.iter().all(|c| c.ways == 2 && c.total_bytes == 64));
}

#[test]
fn test_missing_fields_take_defaults() {
    let config = SystemConfig::from_json(r#"{ "caches": [ { "id": 7 } ] }"#).unwrap();
    assert_eq!(config.block_bytes, 4);
    assert_eq!(config.memory, MemoryConfig::default());
    assert_eq!(
        config.caches,
        vec![CacheConfig {
            id: CacheId(7),
            ways: 2,
            total_bytes: 64,
        }]
    );
}

#[test]
fn test_zeroed_memory_size_defaults() {
    let config = SystemConfig::from_json(r#"{ "memory": { "Zeroed": {} } }"#).unwrap();
    assert_eq!(config.memory, MemoryConfig::Zeroed { size_bytes: 64 * 1024 });
}

#[test]
fn test_file_memory() {
    let config =
        SystemConfig::from_json(r#"{ "memory": { "File": { "path": "mem.img" } } }"#).unwrap();
    assert_eq!(
        config.memory,
        MemoryConfig::File {
            path: PathBuf::from("mem.img")
        }
    );
}

#[test]
fn test_cache_geometry_uses_system_block_size() {
    let cache = CacheConfig {
        id: CacheId(1),
        ways: 4,
        total_bytes: 256,
    };
    let g = cache.geometry(16);
    assert_eq!((g.ways, g.block_bytes, g.total_bytes), (4, 16, 256));
    assert_eq!(g.num_sets(), 4);
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "block_bytes": 8, "caches": [ {{ "id": 1, "ways": 1, "total_bytes": 32 }} ] }}"#
    )
    .unwrap();
    let config = SystemConfig::from_file(file.path()).unwrap();
    assert_eq!(config.block_bytes, 8);
    assert_eq!(config.caches.len(), 1);
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let err = SystemConfig::from_json("{ \"block_bytes\": \"four\" }").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_unreadable_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SystemConfig::from_file(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
