//! Record Store
//!
//! Owns the data file and every record byte in it.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::SyncStrategy;
use crate::error::{CensusError, Result};
use crate::record::{Record, ACTIVE_FLAG_OFFSET, RECORD_SIZE};

use super::RecordScan;

/// Append-only store of fixed-size records
///
/// Existing bytes are never moved; the only in-place write is the
/// `active` flag of a single record.
#[derive(Debug)]
pub struct RecordStore {
    /// Path to the data file
    path: PathBuf,
    /// Read/write handle (seek position is not meaningful between calls)
    file: File,
    /// Current file length; also the offset of the next append
    len: u64,
    sync_strategy: SyncStrategy,
}

impl RecordStore {
    /// Open or create the data file at `path`
    ///
    /// A trailing partial record (crash during append) is truncated away.
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        let mut len = file.metadata()?.len();
        let torn = len % RECORD_SIZE as u64;
        if torn != 0 {
            warn!(
                path = %path.display(),
                torn_bytes = torn,
                "Truncating partial record at end of data file"
            );
            len -= torn;
            file.set_len(len)?;
            file.sync_all()?;
        }

        debug!(path = %path.display(), records = len / RECORD_SIZE as u64, "Record store opened");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            len,
            sync_strategy,
        })
    }

    /// Append `record` and return the offset it was written at
    pub fn append(&mut self, record: &Record) -> Result<u64> {
        let offset = self.len;
        let bytes = record.encode();

        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(&bytes)?;
        self.maybe_sync()?;

        self.len += RECORD_SIZE as u64;
        Ok(offset)
    }

    /// Read the record starting at `offset`
    pub fn read(&mut self, offset: u64) -> Result<Record> {
        self.check_offset(offset)?;

        let mut buf = [0u8; RECORD_SIZE];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut buf)?;

        Record::decode(&buf, offset)
    }

    /// Rewrite the `active` flag of the record at `offset`
    pub fn set_active(&mut self, offset: u64, active: bool) -> Result<()> {
        self.check_offset(offset)?;

        self.file.seek(SeekFrom::Start(offset + ACTIVE_FLAG_OFFSET))?;
        self.file.write_all(&[active as u8])?;
        self.maybe_sync()
    }

    /// Iterate over every stored record in append order
    ///
    /// Opens its own read handle; records appended after the scan starts
    /// are not visited.
    pub fn scan(&self) -> Result<RecordScan> {
        let reader = BufReader::new(File::open(&self.path)?);
        RecordScan::new(reader, self.len)
    }

    /// Force record bytes to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data file length in bytes
    pub fn len_bytes(&self) -> u64 {
        self.len
    }

    pub fn record_count(&self) -> u64 {
        self.len / RECORD_SIZE as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn check_offset(&self, offset: u64) -> Result<()> {
        let end = offset.checked_add(RECORD_SIZE as u64);
        if offset % RECORD_SIZE as u64 != 0 || end.map_or(true, |end| end > self.len) {
            return Err(CensusError::InvalidOffset { offset });
        }
        Ok(())
    }

    fn maybe_sync(&mut self) -> Result<()> {
        if self.sync_strategy == SyncStrategy::EveryWrite {
            self.file.sync_data()?;
        }
        Ok(())
    }
}
