//! Index persistence
//!
//! Streams the header and the four tables to/from disk one slot at a time.
//! Saves go to a sibling temp file that is renamed over the live file.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{CensusError, Result};

use super::{CuckooIndex, HashFamily, IndexElement, IndexHeader, TABLE_COUNT};

impl CuckooIndex {
    /// Write the index to `path` atomically
    ///
    /// Steps:
    /// 1. Stream header + tables into `<path>.tmp`
    /// 2. fsync the temp file
    /// 3. Rename it over `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        let tmp_path = temp_path(path);

        let saved = self
            .write_tables(&tmp_path)
            .and_then(|()| fs::rename(&tmp_path, path).map_err(CensusError::from));
        if let Err(e) = saved {
            // The live file was never touched; discard the partial copy
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        info!(
            path = %path.display(),
            elements = self.len(),
            capacity = self.capacity(),
            "Index saved"
        );
        Ok(())
    }

    /// Stream header + tables into `tmp_path` and fsync it
    fn write_tables(&self, tmp_path: &Path) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(tmp_path)?;
        let mut writer = BufWriter::new(file);

        let header = IndexHeader {
            table_count: TABLE_COUNT as u32,
            table_capacity: self.capacity(),
            element_count: self.len() as u32,
        };
        bincode::serialize_into(&mut writer, &header)?;

        for table in self.tables() {
            for slot in table {
                bincode::serialize_into(&mut writer, slot)?;
            }
        }

        writer.flush()?;
        let file = writer
            .into_inner()
            .map_err(|e| CensusError::Io(e.into_error()))?;
        file.sync_all()?;
        Ok(())
    }

    /// Read an index written by [`CuckooIndex::save`]
    ///
    /// The stored table count and capacity must match the running
    /// configuration; a mismatch is refused rather than reshaped.
    pub fn load(path: &Path, table_capacity: u32, max_attempts: usize) -> Result<Self> {
        if table_capacity == 0 {
            return Err(CensusError::Config(
                "table_capacity must be greater than zero".to_string(),
            ));
        }

        let mut reader = BufReader::new(File::open(path)?);

        let header: IndexHeader = bincode::deserialize_from(&mut reader)?;
        if header.table_count != TABLE_COUNT as u32 || header.table_capacity != table_capacity {
            return Err(CensusError::CapacityMismatch {
                expected_tables: TABLE_COUNT as u32,
                found_tables: header.table_count,
                expected_capacity: table_capacity,
                found_capacity: header.table_capacity,
            });
        }

        let hasher = HashFamily::new(table_capacity);
        let mut occupied = 0usize;
        let mut tables: [Vec<IndexElement>; TABLE_COUNT] = Default::default();

        for (table_no, table) in tables.iter_mut().enumerate() {
            table.reserve_exact(table_capacity as usize);
            for pos in 0..table_capacity as usize {
                let slot: IndexElement = bincode::deserialize_from(&mut reader)?;
                if slot.occupied {
                    if hasher.position(table_no, slot.key) != pos {
                        return Err(CensusError::CorruptIndex(format!(
                            "key {} stored at table {} slot {} but hashes elsewhere",
                            slot.key, table_no, pos
                        )));
                    }
                    occupied += 1;
                }
                table.push(slot);
            }
        }

        if occupied != header.element_count as usize {
            return Err(CensusError::CorruptIndex(format!(
                "header claims {} elements, tables hold {}",
                header.element_count, occupied
            )));
        }

        let mut trailing = [0u8; 1];
        if reader.read(&mut trailing)? != 0 {
            return Err(CensusError::CorruptIndex(
                "unexpected bytes after the last table".to_string(),
            ));
        }

        info!(path = %path.display(), elements = occupied, "Index loaded");

        Ok(Self::from_tables(tables, table_capacity, max_attempts, occupied))
    }
}

/// `<path>.tmp`, next to the live file so the rename stays on one filesystem
fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
