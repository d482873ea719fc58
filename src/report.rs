//! Operation outcomes
//!
//! The vocabulary the registry's callers render: one `Outcome` per
//! operation, each with a stable status code. Nothing here prints.

use std::fmt;

use crate::error::{CensusError, Result};
use crate::index::Insertion;
use crate::record::Record;
use crate::registry::Inserted;

/// Outcome status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Rejected = 0x02,
    Error = 0x03,
}

/// Result of one registry operation, ready to be reported
#[derive(Debug, Clone)]
pub enum Outcome {
    Inserted { key: u32, offset: u64 },
    InsertedAfterRetry { key: u32, offset: u64 },
    DuplicateRejected { key: u32 },
    /// The record was appended at `offset` but could not be indexed
    InsertionFailed { key: u32, offset: u64 },
    Found { record: Box<Record> },
    NotFound { key: u32 },
    Deleted { key: u32 },
    IndexSaved,
    IndexLoaded { elements: usize },
    Failed { reason: String },
}

impl Outcome {
    /// Report for `Registry::insert` / `Registry::register`
    pub fn from_insert(key: u32, result: Result<Inserted>) -> Self {
        match result {
            Ok(Inserted {
                offset,
                insertion: Insertion::Placed,
            }) => Outcome::Inserted { key, offset },
            Ok(Inserted {
                offset,
                insertion: Insertion::PlacedAfterRetry,
            }) => Outcome::InsertedAfterRetry { key, offset },
            Err(CensusError::DuplicateKey { key }) => Outcome::DuplicateRejected { key },
            Err(CensusError::DisplacementExhausted { key, offset, .. }) => {
                Outcome::InsertionFailed { key, offset }
            }
            Err(e) => Outcome::failed(e),
        }
    }

    /// Report for `Registry::get`
    pub fn from_get(key: u32, result: Result<Option<Record>>) -> Self {
        match result {
            Ok(Some(record)) => Outcome::Found {
                record: Box::new(record),
            },
            Ok(None) => Outcome::NotFound { key },
            Err(e) => Outcome::failed(e),
        }
    }

    /// Report for `Registry::delete`
    pub fn from_delete(key: u32, result: Result<bool>) -> Self {
        match result {
            Ok(true) => Outcome::Deleted { key },
            Ok(false) => Outcome::NotFound { key },
            Err(e) => Outcome::failed(e),
        }
    }

    /// Report for `Registry::save_index`
    pub fn from_save(result: Result<()>) -> Self {
        match result {
            Ok(()) => Outcome::IndexSaved,
            Err(e) => Outcome::failed(e),
        }
    }

    /// Report for an index load; `elements` is read after a successful load
    pub fn from_load(result: Result<usize>) -> Self {
        match result {
            Ok(elements) => Outcome::IndexLoaded { elements },
            Err(e) => Outcome::failed(e),
        }
    }

    fn failed(err: CensusError) -> Self {
        Outcome::Failed {
            reason: err.to_string(),
        }
    }

    /// Get the status code
    pub fn status(&self) -> Status {
        match self {
            Outcome::Inserted { .. }
            | Outcome::InsertedAfterRetry { .. }
            | Outcome::Found { .. }
            | Outcome::Deleted { .. }
            | Outcome::IndexSaved
            | Outcome::IndexLoaded { .. } => Status::Ok,
            Outcome::NotFound { .. } => Status::NotFound,
            Outcome::DuplicateRejected { .. } => Status::Rejected,
            Outcome::InsertionFailed { .. } | Outcome::Failed { .. } => Status::Error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status() == Status::Ok
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Inserted { key, offset } => {
                write!(f, "inserted {key} at offset {offset}")
            }
            Outcome::InsertedAfterRetry { key, offset } => {
                write!(f, "inserted {key} at offset {offset} (after extended retry)")
            }
            Outcome::DuplicateRejected { key } => {
                write!(f, "rejected: key {key} already exists")
            }
            Outcome::InsertionFailed { key, offset } => write!(
                f,
                "failed: key {key} could not be indexed; record left unindexed at offset {offset}"
            ),
            Outcome::Found { record } => {
                writeln!(f, "key:            {}", record.key)?;
                writeln!(f, "first names:    {}", record.first_names)?;
                writeln!(f, "last names:     {}", record.last_names)?;
                writeln!(f, "department:     {}", record.department)?;
                writeln!(f, "province:       {}", record.province)?;
                writeln!(f, "city:           {}", record.city)?;
                writeln!(f, "district:       {}", record.district)?;
                writeln!(f, "location:       {}", record.location)?;
                writeln!(f, "phone:          {}", record.phone)?;
                writeln!(f, "email:          {}", record.email)?;
                writeln!(f, "marital status: {}", record.marital_status)?;
                write!(f, "active:         {}", record.active)
            }
            Outcome::NotFound { key } => write!(f, "not found: {key}"),
            Outcome::Deleted { key } => write!(f, "deleted {key}"),
            Outcome::IndexSaved => write!(f, "index saved"),
            Outcome::IndexLoaded { elements } => write!(f, "index loaded ({elements} keys)"),
            Outcome::Failed { reason } => write!(f, "error: {reason}"),
        }
    }
}
