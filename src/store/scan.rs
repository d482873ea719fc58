//! Record Scan
//!
//! Sequential iteration over all records in a data file.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};

use crate::error::Result;
use crate::record::{Record, RECORD_SIZE};

/// Iterator over `(offset, record)` pairs in append order
pub struct RecordScan {
    reader: BufReader<File>,
    /// Stop reading at this offset (store length when the scan began)
    end_offset: u64,
    current_offset: u64,
}

impl RecordScan {
    pub(super) fn new(mut reader: BufReader<File>, end_offset: u64) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self {
            reader,
            end_offset,
            current_offset: 0,
        })
    }
}

impl Iterator for RecordScan {
    /// A decode error is yielded for its record and the scan moves on
    type Item = (u64, Result<Record>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_offset + RECORD_SIZE as u64 > self.end_offset {
            return None;
        }

        let offset = self.current_offset;
        let mut buf = [0u8; RECORD_SIZE];
        if let Err(e) = self.reader.read_exact(&mut buf) {
            // An I/O failure ends the scan after reporting it
            self.current_offset = self.end_offset;
            return Some((offset, Err(e.into())));
        }
        self.current_offset += RECORD_SIZE as u64;

        Some((offset, Record::decode(&buf, offset)))
    }
}
