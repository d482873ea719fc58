//! Index Module
//!
//! Four-table cuckoo hash mapping key → record offset.
//!
//! ## Responsibilities
//! - Resolve a key to its designated slot in each table (hash family)
//! - Insert with bounded displacement and one escalation retry
//! - O(1) lookup: exactly four slot inspections
//! - Tombstone deletion and element-count bookkeeping
//! - Persist/restore the tables independently of the record file
//!
//! ## File Format
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │ Header (12 bytes)                                         │
//! │   TableCount: u32 | TableCapacity: u32 | ElementCount: u32│
//! ├───────────────────────────────────────────────────────────┤
//! │ Table 0: TableCapacity slots                              │
//! │   [Key: u32][Offset: u64][Occupied: u8]  (13 bytes each)  │
//! ├───────────────────────────────────────────────────────────┤
//! │ Table 1, Table 2, Table 3 (same layout)                   │
//! └───────────────────────────────────────────────────────────┘
//! ```
//! All integers are little-endian.

mod cuckoo;
mod hash;
mod persist;

use serde::{Deserialize, Serialize};

pub use cuckoo::{CuckooIndex, Insertion};
pub use hash::HashFamily;

/// Number of tables (and hash functions) in the index
pub const TABLE_COUNT: usize = 4;

/// Encoded header size: three u32 fields
pub const HEADER_SIZE: u64 = 12;

/// Encoded slot size: key (4) + offset (8) + occupied (1)
pub const SLOT_SIZE: u64 = 13;

/// One cell of one table
///
/// When `occupied` is false the key and offset carry no meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexElement {
    pub key: u32,
    pub offset: u64,
    pub occupied: bool,
}

impl IndexElement {
    /// An occupied slot holding `key → offset`
    pub fn new(key: u32, offset: u64) -> Self {
        Self {
            key,
            offset,
            occupied: true,
        }
    }

    /// True if this slot is occupied by `key`
    pub fn holds(&self, key: u32) -> bool {
        self.occupied && self.key == key
    }
}

/// Metadata written in front of the serialized tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexHeader {
    pub table_count: u32,
    pub table_capacity: u32,
    pub element_count: u32,
}
