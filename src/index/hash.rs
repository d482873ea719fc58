//! Hash family
//!
//! Four cheap arithmetic mixes, one per table. Dense 8-digit keys spread
//! well as long as the capacity shares no factor with the multipliers
//! (7, 13, 17, 23); a prime capacity is the safe choice.

use super::TABLE_COUNT;

/// Multipliers used by the four functions
const FACTORS: [u32; 4] = [7, 13, 17, 23];

/// Maps keys to slot positions for a fixed table capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFamily {
    capacity: u32,
}

impl HashFamily {
    pub fn new(capacity: u32) -> Self {
        assert!(capacity > 0, "table capacity must be non-zero");
        Self { capacity }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Slot position of `key` in `table`
    #[inline]
    pub fn position(&self, table: usize, key: u32) -> usize {
        let mixed = match table % TABLE_COUNT {
            0 => (key / 7919).wrapping_add(key.wrapping_mul(13)),
            1 => (key >> 12).wrapping_add(key.wrapping_mul(17)),
            2 => key.wrapping_mul(23).wrapping_add(key % 7919),
            _ => key.wrapping_add(1_234_567).wrapping_mul(7),
        };
        (mixed % self.capacity) as usize
    }

    /// Slot positions of `key` in every table, in table order
    pub fn positions(&self, key: u32) -> [usize; TABLE_COUNT] {
        std::array::from_fn(|table| self.position(table, key))
    }

    /// True if the capacity degrades one of the functions
    pub fn is_degenerate(&self) -> bool {
        FACTORS.iter().any(|f| self.capacity % f == 0)
    }
}
