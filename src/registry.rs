//! Registry Module
//!
//! The facade that coordinates intake, the record store and the index.
//!
//! ## Responsibilities
//! - Open the data directory, load or rebuild the index
//! - Reject duplicates and enforce the load-factor ceiling before writing
//! - Append records, then index their offsets
//! - Logical deletion (flag the record, drop the index entry)
//! - Persist the index on demand and on close

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CensusError, Result};
use crate::index::{CuckooIndex, HashFamily, Insertion, TABLE_COUNT};
use crate::intake::{self, CandidateFields};
use crate::record::Record;
use crate::store::RecordStore;

/// Where a newly inserted record landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted {
    /// Byte offset of the record in the data file
    pub offset: u64,
    pub insertion: Insertion,
}

/// Counters from a full-scan index rebuild
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RebuildStats {
    /// Records visited
    pub scanned: u64,
    /// Active records now indexed
    pub indexed: u64,
    /// Logically deleted records skipped
    pub inactive: u64,
    /// Records that failed to decode
    pub corrupt: u64,
    /// Older active copies of a key replaced by a later one
    pub superseded: u64,
    /// Active records the index could not place
    pub failed: u64,
}

/// Point-in-time view of the registry
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryStats {
    /// Records in the data file, active or not
    pub records: u64,
    /// Keys currently indexed
    pub indexed: usize,
    pub table_capacity: u32,
    pub total_slots: usize,
    pub load_factor: f64,
    pub table_occupancy: [usize; TABLE_COUNT],
}

#[derive(Debug)]
struct Inner {
    store: RecordStore,
    index: CuckooIndex,
}

/// Person registry: append-only records addressed through a cuckoo index
///
/// ## Concurrency Model
///
/// Every operation takes the single `inner` lock, so slot read-check-write
/// sequences and the index's start-table rotation are never observed
/// mid-mutation. There is no locking across the data file and the index
/// file on disk.
///
/// ## Consistency
///
/// A record is appended before it is indexed. If indexing then fails the
/// record stays in the data file without an index entry (an orphan).
/// `rebuild_index` recovers orphans by scanning the data file.
#[derive(Debug)]
pub struct Registry {
    config: Config,
    data_path: PathBuf,
    index_path: PathBuf,
    inner: Mutex<Inner>,
}

impl Registry {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const DATA_FILENAME: &'static str = "records.dat";
    const INDEX_FILENAME: &'static str = "index.idx";

    /// Open or create a registry with the given config
    ///
    /// On startup:
    /// 1. Validate config and create the data directory
    /// 2. Open the record store (repairs a torn tail)
    /// 3. Load the persisted index, or rebuild it by scan if none exists
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        let data_path = config.data_dir.join(Self::DATA_FILENAME);
        let index_path = config.data_dir.join(Self::INDEX_FILENAME);

        if HashFamily::new(config.table_capacity).is_degenerate() {
            warn!(
                capacity = config.table_capacity,
                "Table capacity shares a factor with a hash multiplier; prefer a prime"
            );
        }

        let store = RecordStore::open(&data_path, config.sync_strategy)?;

        let inner = if index_path.exists() {
            let index = CuckooIndex::load(&index_path, config.table_capacity, config.max_attempts)?;
            Inner { store, index }
        } else {
            let index = CuckooIndex::new(config.table_capacity, config.max_attempts);
            let mut inner = Inner { store, index };
            if !inner.store.is_empty() {
                info!("No index file found, rebuilding from data file");
                Self::rebuild(&mut inner, &config)?;
            }
            inner
        };

        info!(
            data_dir = %config.data_dir.display(),
            records = inner.store.record_count(),
            indexed = inner.index.len(),
            "Registry opened"
        );

        Ok(Self {
            config,
            data_path,
            index_path,
            inner: Mutex::new(inner),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Validate candidate fields and insert the resulting record
    pub fn register(&self, candidate: &CandidateFields) -> Result<Inserted> {
        let record = intake::submit(candidate)?;
        self.insert(&record)
    }

    /// Insert an already-validated record
    ///
    /// Steps:
    /// 1. Reject a key that is already indexed
    /// 2. Refuse if the load factor has reached the ceiling
    /// 3. Append the record to the data file
    /// 4. Index `key → offset` (one escalation retry inside the index)
    pub fn insert(&self, record: &Record) -> Result<Inserted> {
        let mut inner = self.inner.lock();
        let key = record.key;

        if Self::live_record(&mut inner, key)?.is_some() {
            return Err(CensusError::DuplicateKey { key });
        }

        let load_factor = inner.index.load_factor();
        if load_factor >= self.config.max_load_factor {
            return Err(CensusError::LoadCeilingReached {
                load_factor,
                ceiling: self.config.max_load_factor,
            });
        }

        let offset = inner.store.append(record)?;

        match inner.index.insert(key, offset) {
            Ok(insertion) => {
                debug!(key, offset, ?insertion, "Record inserted");
                Ok(Inserted { offset, insertion })
            }
            Err(e) => {
                warn!(key, offset, error = %e, "Record appended but not indexed (orphan)");
                Err(e)
            }
        }
    }

    /// Fetch the record stored under `key`
    pub fn get(&self, key: u32) -> Result<Option<Record>> {
        let mut inner = self.inner.lock();
        Ok(Self::live_record(&mut inner, key)?.map(|(_, record)| record))
    }

    /// Offset and record indexed under `key`, if that record is still active
    ///
    /// An entry pointing at an inactive record (index file older than the
    /// data file after a crash) is stale: it is dropped and `None` returned.
    fn live_record(inner: &mut Inner, key: u32) -> Result<Option<(u64, Record)>> {
        let offset = match inner.index.find(key) {
            Some(offset) => offset,
            None => return Ok(None),
        };

        let record = inner.store.read(offset)?;
        if record.key != key {
            return Err(CensusError::CorruptIndex(format!(
                "key {} points at offset {} which holds key {}",
                key, offset, record.key
            )));
        }

        if !record.active {
            warn!(key, offset, "Dropping index entry for a deleted record");
            inner.index.delete(key);
            return Ok(None);
        }
        Ok(Some((offset, record)))
    }

    /// Data file offset of `key`, if indexed
    pub fn locate(&self, key: u32) -> Option<u64> {
        self.inner.lock().index.find(key)
    }

    /// Logically delete `key`
    ///
    /// Marks the record inactive in the data file, then clears its index
    /// slot. Returns false if no active record is indexed under the key.
    pub fn delete(&self, key: u32) -> Result<bool> {
        let mut inner = self.inner.lock();

        let offset = match Self::live_record(&mut inner, key)? {
            Some((offset, _)) => offset,
            None => return Ok(false),
        };

        inner.store.set_active(offset, false)?;
        inner.index.delete(key);

        debug!(key, offset, "Record deleted");
        Ok(true)
    }

    // =========================================================================
    // Index Maintenance
    // =========================================================================

    /// Persist the index (atomic replace)
    pub fn save_index(&self) -> Result<()> {
        self.inner.lock().index.save(&self.index_path)
    }

    /// Replace the in-memory index with the persisted one
    ///
    /// Returns the number of keys loaded. On error the current index is kept.
    pub fn reload_index(&self) -> Result<usize> {
        let index = CuckooIndex::load(
            &self.index_path,
            self.config.table_capacity,
            self.config.max_attempts,
        )?;
        let elements = index.len();
        self.inner.lock().index = index;
        Ok(elements)
    }

    /// Discard the in-memory index and rebuild it by scanning the data file
    pub fn rebuild_index(&self) -> Result<RebuildStats> {
        let mut inner = self.inner.lock();
        Self::rebuild(&mut inner, &self.config)
    }

    fn rebuild(inner: &mut Inner, config: &Config) -> Result<RebuildStats> {
        let mut index = CuckooIndex::new(config.table_capacity, config.max_attempts);
        let mut stats = RebuildStats::default();

        for (offset, result) in inner.store.scan()? {
            stats.scanned += 1;

            let record = match result {
                Ok(record) => record,
                Err(CensusError::CorruptRecord { reason, .. }) => {
                    warn!(offset, %reason, "Skipping corrupt record");
                    stats.corrupt += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            // Append order: the latest copy of a key decides, deleted or not
            if index.delete(record.key) {
                stats.superseded += 1;
                stats.indexed -= 1;
            }

            if !record.active {
                stats.inactive += 1;
                continue;
            }

            match index.insert(record.key, offset) {
                Ok(_) => stats.indexed += 1,
                Err(CensusError::DisplacementExhausted { .. }) => {
                    warn!(key = record.key, offset, "Rebuild could not place record");
                    stats.failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        inner.index = index;
        info!(?stats, "Index rebuilt");
        Ok(stats)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Save the index and flush the data file
    pub fn close(self) -> Result<()> {
        let mut inner = self.inner.into_inner();
        inner.index.save(&self.index_path)?;
        inner.store.sync()?;
        info!("Registry closed");
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    pub fn stats(&self) -> RegistryStats {
        let inner = self.inner.lock();
        RegistryStats {
            records: inner.store.record_count(),
            indexed: inner.index.len(),
            table_capacity: inner.index.capacity(),
            total_slots: inner.index.total_slots(),
            load_factor: inner.index.load_factor(),
            table_occupancy: inner.index.table_occupancy(),
        }
    }

    /// Number of indexed keys
    pub fn len(&self) -> usize {
        self.inner.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
