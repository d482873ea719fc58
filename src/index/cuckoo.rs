//! Cuckoo index implementation
//!
//! Four parallel tables with bounded displacement.

use std::fmt;

use tracing::{debug, warn};

use crate::error::{CensusError, Result};

use super::{HashFamily, IndexElement, TABLE_COUNT};

/// How a successful insertion was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// Placed within the default displacement budget
    Placed,
    /// Needed the escalation retry with a doubled budget
    PlacedAfterRetry,
}

/// In-memory four-table cuckoo hash: key → record offset
///
/// ## Invariants
/// - A key occupies at most one slot across all tables
/// - `element_count` equals the number of occupied slots
/// - An occupied slot in table `i` sits at `h_i(key)`
pub struct CuckooIndex {
    /// Slot tables, each exactly `hasher.capacity()` long
    tables: [Vec<IndexElement>; TABLE_COUNT],

    hasher: HashFamily,

    /// Number of occupied slots across all tables
    element_count: usize,

    /// Table where the next insertion starts; advances on every insert call
    next_start_table: usize,

    /// Default displacement budget (escalation uses twice this)
    max_attempts: usize,
}

impl CuckooIndex {
    /// Create an empty index with `table_capacity` slots per table
    ///
    /// Panics if `table_capacity` is zero.
    pub fn new(table_capacity: u32, max_attempts: usize) -> Self {
        let tables = std::array::from_fn(|_| vec![IndexElement::default(); table_capacity as usize]);
        Self::from_tables(tables, table_capacity, max_attempts, 0)
    }

    /// Assemble an index from already-populated tables (used by load)
    pub(super) fn from_tables(
        tables: [Vec<IndexElement>; TABLE_COUNT],
        table_capacity: u32,
        max_attempts: usize,
        element_count: usize,
    ) -> Self {
        Self {
            tables,
            hasher: HashFamily::new(table_capacity),
            element_count,
            next_start_table: 0,
            max_attempts,
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Offset of the record stored under `key`, if indexed
    ///
    /// Inspects exactly one slot per table.
    pub fn find(&self, key: u32) -> Option<u64> {
        self.locate(key)
            .map(|(table, pos)| self.tables[table][pos].offset)
    }

    /// `(table, position)` of the slot holding `key`
    pub fn locate(&self, key: u32) -> Option<(usize, usize)> {
        (0..TABLE_COUNT)
            .map(|table| (table, self.hasher.position(table, key)))
            .find(|&(table, pos)| self.tables[table][pos].holds(key))
    }

    pub fn contains(&self, key: u32) -> bool {
        self.locate(key).is_some()
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Insert `key → offset`, escalating once on displacement failure
    ///
    /// Steps:
    /// 1. Reject keys that are already indexed (existing slot untouched)
    /// 2. Try with the default budget
    /// 3. On exhaustion, retry the whole insertion with twice the budget
    /// 4. A second exhaustion is reported; the key is not indexed
    pub fn insert(&mut self, key: u32, offset: u64) -> Result<Insertion> {
        if self.contains(key) {
            return Err(CensusError::DuplicateKey { key });
        }

        let budget = self.max_attempts;
        if self.insert_with_budget(key, offset, budget).is_ok() {
            return Ok(Insertion::Placed);
        }

        warn!(key, budget, "Displacement budget exhausted, retrying with doubled budget");

        self.insert_with_budget(key, offset, budget.saturating_mul(2))?;
        Ok(Insertion::PlacedAfterRetry)
    }

    /// Single insertion pass with an explicit displacement budget
    ///
    /// The caller guarantees `key` is not already indexed. On failure the
    /// recorded displacements are undone, so the tables are left exactly
    /// as they were before the call.
    pub fn insert_with_budget(&mut self, key: u32, offset: u64, budget: usize) -> Result<()> {
        let mut current = self.next_start_table;
        self.next_start_table = (self.next_start_table + 1) % TABLE_COUNT;

        let mut item = IndexElement::new(key, offset);
        let mut evictions: Vec<(usize, usize)> = Vec::new();

        for _ in 0..budget {
            // Home slot in the current table
            let pos = self.hasher.position(current, item.key);
            if !self.tables[current][pos].occupied {
                self.place(current, pos, item);
                return Ok(());
            }

            // Any free slot in the other three tables
            for step in 1..TABLE_COUNT {
                let table = (current + step) % TABLE_COUNT;
                let alt = self.hasher.position(table, item.key);
                if !self.tables[table][alt].occupied {
                    self.place(table, alt, item);
                    return Ok(());
                }
            }

            // Nowhere free: evict the home occupant and carry it forward
            std::mem::swap(&mut item, &mut self.tables[current][pos]);
            evictions.push((current, pos));
            current = (current + 1) % TABLE_COUNT;
        }

        // Undo the chain in reverse; `item` ends up as the original pair
        for &(table, pos) in evictions.iter().rev() {
            std::mem::swap(&mut item, &mut self.tables[table][pos]);
        }
        debug_assert!(item.key == key && item.offset == offset);

        debug!(key, budget, evictions = evictions.len(), "Insertion pass failed");

        Err(CensusError::DisplacementExhausted {
            key,
            offset,
            attempts: budget,
        })
    }

    fn place(&mut self, table: usize, pos: usize, item: IndexElement) {
        self.tables[table][pos] = item;
        self.element_count += 1;
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Clear the slot holding `key`; false if the key is not indexed
    pub fn delete(&mut self, key: u32) -> bool {
        match self.locate(key) {
            Some((table, pos)) => {
                self.tables[table][pos] = IndexElement::default();
                self.element_count -= 1;
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of indexed keys
    pub fn len(&self) -> usize {
        self.element_count
    }

    pub fn is_empty(&self) -> bool {
        self.element_count == 0
    }

    /// Slots per table
    pub fn capacity(&self) -> u32 {
        self.hasher.capacity()
    }

    /// Slots across all tables
    pub fn total_slots(&self) -> usize {
        self.hasher.capacity() as usize * TABLE_COUNT
    }

    /// Fraction of all slots that are occupied
    pub fn load_factor(&self) -> f64 {
        self.element_count as f64 / self.total_slots() as f64
    }

    /// Occupied slots per table
    pub fn table_occupancy(&self) -> [usize; TABLE_COUNT] {
        std::array::from_fn(|table| self.tables[table].iter().filter(|e| e.occupied).count())
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn hasher(&self) -> &HashFamily {
        &self.hasher
    }

    /// Iterate over indexed `(key, offset)` pairs in table/slot order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.tables
            .iter()
            .flat_map(|table| table.iter())
            .filter(|e| e.occupied)
            .map(|e| (e.key, e.offset))
    }

    pub(super) fn tables(&self) -> &[Vec<IndexElement>; TABLE_COUNT] {
        &self.tables
    }
}

impl fmt::Debug for CuckooIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuckooIndex")
            .field("table_capacity", &self.hasher.capacity())
            .field("element_count", &self.element_count)
            .field("next_start_table", &self.next_start_table)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}
