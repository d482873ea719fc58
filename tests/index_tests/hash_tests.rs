//! Tests for the hash family
//!
//! These tests verify:
//! - Positions are deterministic and within capacity
//! - Known positions for a reference key
//! - Spread of dense and random key streams

use std::collections::HashSet;

use census_store::index::{HashFamily, TABLE_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Determinism & Range
// =============================================================================

#[test]
fn test_positions_are_deterministic() {
    let family = HashFamily::new(10_007);
    for key in [10_000_000u32, 12_345_678, 55_555_555, 99_999_999] {
        assert_eq!(family.positions(key), family.positions(key));
        for table in 0..TABLE_COUNT {
            assert_eq!(family.position(table, key), family.positions(key)[table]);
        }
    }
}

#[test]
fn test_positions_stay_within_capacity() {
    let mut rng = StdRng::seed_from_u64(7);
    for capacity in [1u32, 2, 11, 1009, 524_287] {
        let family = HashFamily::new(capacity);
        for _ in 0..1_000 {
            let key: u32 = rng.gen();
            for pos in family.positions(key) {
                assert!(pos < capacity as usize);
            }
        }
    }
}

#[test]
fn test_reference_key_positions() {
    let family = HashFamily::new(1_000_003);
    assert_eq!(family.positions(12_345_678), [494_892, 878_913, 957_621, 61_430]);
}

#[test]
fn test_capacity_change_moves_keys() {
    let small = HashFamily::new(1009);
    let large = HashFamily::new(10_007);
    let moved = (10_000_000u32..10_000_100)
        .filter(|&key| small.positions(key) != large.positions(key))
        .count();
    assert!(moved > 90);
}

// =============================================================================
// Spread
// =============================================================================

#[test]
fn test_dense_keys_form_permutation_in_last_table() {
    let family = HashFamily::new(10_007);
    let positions: HashSet<usize> = (10_000_000u32..10_010_000)
        .map(|key| family.position(3, key))
        .collect();
    assert_eq!(positions.len(), 10_000);
}

#[test]
fn test_dense_keys_spread_in_every_table() {
    let family = HashFamily::new(10_007);
    for table in 0..TABLE_COUNT {
        let distinct: HashSet<usize> = (10_000_000u32..10_010_000)
            .map(|key| family.position(table, key))
            .collect();
        assert!(
            distinct.len() > 7_000,
            "table {} only used {} slots",
            table,
            distinct.len()
        );
    }
}

#[test]
fn test_random_keys_fill_buckets_evenly() {
    let family = HashFamily::new(101);
    let mut rng = StdRng::seed_from_u64(42);
    let keys: Vec<u32> = (0..10_100)
        .map(|_| rng.gen_range(10_000_000..=99_999_999))
        .collect();

    for table in 0..TABLE_COUNT {
        let mut buckets = [0usize; 101];
        for &key in &keys {
            buckets[family.position(table, key)] += 1;
        }
        let min = *buckets.iter().min().unwrap();
        let max = *buckets.iter().max().unwrap();
        assert!(min >= 40 && max <= 200, "table {} spread {}..{}", table, min, max);
    }
}
