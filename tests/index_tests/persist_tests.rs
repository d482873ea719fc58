//! Tests for index persistence
//!
//! These tests verify:
//! - Save/load round-trips (element count and every lookup)
//! - Atomic save (no temp file left, live file replaced)
//! - File layout size
//! - Refusal of mismatched, truncated and corrupt files

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use census_store::index::{CuckooIndex, HEADER_SIZE, SLOT_SIZE, TABLE_COUNT};
use census_store::CensusError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_index_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index.idx");
    (temp_dir, path)
}

/// Index with keys 10000001..=10000000+count at offsets 0, 162, 324, ...
fn index_with_keys(capacity: u32, count: u32) -> CuckooIndex {
    let mut index = CuckooIndex::new(capacity, 500);
    for i in 0..count {
        index.insert(10_000_001 + i, i as u64 * 162).unwrap();
    }
    index
}

/// Write a raw index file: header followed by `slots` (key, offset, occupied)
fn write_raw(path: &PathBuf, header: [u32; 3], slots: &[(u32, u64, u8)]) {
    let mut file = fs::File::create(path).unwrap();
    for field in header {
        file.write_all(&field.to_le_bytes()).unwrap();
    }
    for (key, offset, occupied) in slots {
        file.write_all(&key.to_le_bytes()).unwrap();
        file.write_all(&offset.to_le_bytes()).unwrap();
        file.write_all(&[*occupied]).unwrap();
    }
}

// =============================================================================
// Round Trips
// =============================================================================

#[test]
fn test_save_then_load_round_trip() {
    let (_temp, path) = setup_temp_index_path();
    let index = index_with_keys(1009, 100);

    index.save(&path).unwrap();
    let loaded = CuckooIndex::load(&path, 1009, 500).unwrap();

    assert_eq!(loaded.len(), 100);
    for i in 0..100u32 {
        assert_eq!(loaded.find(10_000_001 + i), Some(i as u64 * 162));
    }
    let original: Vec<(u32, u64)> = index.iter().collect();
    let restored: Vec<(u32, u64)> = loaded.iter().collect();
    assert_eq!(original, restored);
}

#[test]
fn test_concrete_scenario_survives_reload() {
    let (_temp, path) = setup_temp_index_path();
    let mut index = CuckooIndex::new(1009, 500);

    index.insert(12_345_678, 0).unwrap();
    assert!(index.insert(12_345_678, 0).is_err());
    assert!(index.delete(12_345_678));

    for i in 0..100u32 {
        index.insert(10_000_001 + i, (i as u64 + 1) * 162).unwrap();
    }
    index.save(&path).unwrap();

    let loaded = CuckooIndex::load(&path, 1009, 500).unwrap();
    assert_eq!(loaded.len(), 100);
    assert_eq!(loaded.find(12_345_678), None);
    for i in 0..100u32 {
        assert_eq!(loaded.find(10_000_001 + i), Some((i as u64 + 1) * 162));
    }
}

#[test]
fn test_empty_index_round_trip() {
    let (_temp, path) = setup_temp_index_path();
    CuckooIndex::new(11, 500).save(&path).unwrap();

    let loaded = CuckooIndex::load(&path, 11, 500).unwrap();

    assert!(loaded.is_empty());
    assert_eq!(loaded.capacity(), 11);
}

#[test]
fn test_loaded_index_accepts_new_inserts_and_deletes() {
    let (_temp, path) = setup_temp_index_path();
    index_with_keys(1009, 50).save(&path).unwrap();

    let mut loaded = CuckooIndex::load(&path, 1009, 500).unwrap();
    loaded.insert(55_555_555, 50 * 162).unwrap();
    assert!(loaded.delete(10_000_001));
    assert!(matches!(
        loaded.insert(10_000_002, 0),
        Err(CensusError::DuplicateKey { .. })
    ));

    assert_eq!(loaded.len(), 50);
    assert_eq!(loaded.find(55_555_555), Some(50 * 162));
}

// =============================================================================
// File Layout & Atomicity
// =============================================================================

#[test]
fn test_file_size_matches_layout() {
    let (_temp, path) = setup_temp_index_path();
    index_with_keys(101, 10).save(&path).unwrap();

    let size = fs::metadata(&path).unwrap().len();
    assert_eq!(size, HEADER_SIZE + TABLE_COUNT as u64 * 101 * SLOT_SIZE);
}

#[test]
fn test_header_fields_are_little_endian() {
    let (_temp, path) = setup_temp_index_path();
    index_with_keys(101, 10).save(&path).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert_eq!(&bytes[0..4], &4u32.to_le_bytes());
    assert_eq!(&bytes[4..8], &101u32.to_le_bytes());
    assert_eq!(&bytes[8..12], &10u32.to_le_bytes());
}

#[test]
fn test_save_leaves_no_temp_file() {
    let (temp, path) = setup_temp_index_path();
    index_with_keys(101, 10).save(&path).unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["index.idx".to_string()]);
}

#[test]
fn test_save_replaces_previous_file() {
    let (_temp, path) = setup_temp_index_path();
    index_with_keys(101, 10).save(&path).unwrap();
    index_with_keys(101, 3).save(&path).unwrap();

    let loaded = CuckooIndex::load(&path, 101, 500).unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded.find(10_000_004), None);
}

#[test]
fn test_failed_save_removes_temp_file() {
    let (temp, path) = setup_temp_index_path();
    // A directory at the live path makes the final rename fail
    fs::create_dir(&path).unwrap();

    assert!(index_with_keys(101, 10).save(&path).is_err());

    assert!(path.is_dir());
    assert!(!temp.path().join("index.idx.tmp").exists());
}

// =============================================================================
// Refused Loads
// =============================================================================

#[test]
fn test_capacity_mismatch_is_refused() {
    let (_temp, path) = setup_temp_index_path();
    index_with_keys(1009, 10).save(&path).unwrap();

    let err = CuckooIndex::load(&path, 1013, 500).unwrap_err();

    match err {
        CensusError::CapacityMismatch {
            expected_capacity,
            found_capacity,
            ..
        } => {
            assert_eq!(expected_capacity, 1013);
            assert_eq!(found_capacity, 1009);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_table_count_mismatch_is_refused() {
    let (_temp, path) = setup_temp_index_path();
    write_raw(&path, [3, 1, 0], &[(0, 0, 0); 3]);

    let err = CuckooIndex::load(&path, 1, 500).unwrap_err();

    assert!(matches!(
        err,
        CensusError::CapacityMismatch {
            found_tables: 3,
            expected_tables: 4,
            ..
        }
    ));
}

#[test]
fn test_truncated_file_is_an_io_error() {
    let (_temp, path) = setup_temp_index_path();
    index_with_keys(101, 10).save(&path).unwrap();

    let len = fs::metadata(&path).unwrap().len();
    let file = OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(len - 5).unwrap();
    drop(file);

    match CuckooIndex::load(&path, 101, 500) {
        Err(CensusError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("truncated index loaded"),
    }
}

#[test]
fn test_missing_file_is_an_io_error() {
    let (_temp, path) = setup_temp_index_path();
    assert!(matches!(
        CuckooIndex::load(&path, 101, 500),
        Err(CensusError::Io(_))
    ));
}

#[test]
fn test_element_count_mismatch_is_corruption() {
    let (_temp, path) = setup_temp_index_path();
    index_with_keys(101, 10).save(&path).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    bytes[8..12].copy_from_slice(&11u32.to_le_bytes());
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        CuckooIndex::load(&path, 101, 500),
        Err(CensusError::CorruptIndex(_))
    ));
}

#[test]
fn test_misplaced_slot_is_corruption() {
    let (_temp, path) = setup_temp_index_path();
    // Capacity 2: key 10000001 hashes to (10000001/7919 + 10000001*13) % 2 = 1
    // in table 0, so storing it at slot 0 is inconsistent.
    let mut slots = vec![(0u32, 0u64, 0u8); 8];
    slots[0] = (10_000_001, 0, 1);
    write_raw(&path, [4, 2, 1], &slots);

    assert!(matches!(
        CuckooIndex::load(&path, 2, 500),
        Err(CensusError::CorruptIndex(_))
    ));
}

#[test]
fn test_trailing_bytes_are_corruption() {
    let (_temp, path) = setup_temp_index_path();
    index_with_keys(101, 10).save(&path).unwrap();

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&[0u8; 3]).unwrap();
    drop(file);

    assert!(matches!(
        CuckooIndex::load(&path, 101, 500),
        Err(CensusError::CorruptIndex(_))
    ));
}

#[test]
fn test_invalid_occupied_byte_is_rejected() {
    let (_temp, path) = setup_temp_index_path();
    let mut slots = vec![(0u32, 0u64, 0u8); 4];
    slots[0] = (0, 0, 9);
    write_raw(&path, [4, 1, 0], &slots);

    assert!(matches!(
        CuckooIndex::load(&path, 1, 500),
        Err(CensusError::Serialization(_))
    ));
}
