//! Record Module
//!
//! Fixed-width binary person records.
//!
//! ## Responsibilities
//! - Define the stable on-disk layout of a person record
//! - Encode/decode records to exactly `RECORD_SIZE` bytes
//! - Hold fixed-width, NUL-padded text fields
//!
//! ## Record Layout (162 bytes)
//! ```text
//! ┌─────────┬────────────┬────────────┬──────────┬──────────┬──────────┐
//! │ Key (4) │ Names (20) │ Surnm (20) │ Dept (15)│ Prov (15)│ City (15)│
//! ├─────────┴──┬─────────┴───┬────────┴──┬───────┴───┬──────┴─────┬────┤
//! │ Distr (15) │ Locat (15)  │ Phone (10)│ Email (20)│ Marital(12)│ A  │
//! └────────────┴─────────────┴───────────┴───────────┴────────────┴────┘
//! ```
//! `A` is the one-byte `active` flag at offset 161. It is the only byte the
//! store ever rewrites in place.

mod person;
mod text;

pub use person::{MaritalStatus, Record};
pub use text::FixedText;

/// Size of one encoded record in bytes
pub const RECORD_SIZE: usize = 162;

/// Byte offset of the `active` flag within an encoded record
pub const ACTIVE_FLAG_OFFSET: u64 = 161;

/// Smallest valid key (8 decimal digits)
pub const MIN_KEY: u32 = 10_000_000;

/// Largest valid key (8 decimal digits)
pub const MAX_KEY: u32 = 99_999_999;

// Field widths, including the mandatory trailing NUL
pub const NAMES_WIDTH: usize = 20;
pub const SURNAMES_WIDTH: usize = 20;
pub const REGION_WIDTH: usize = 15;
pub const PHONE_WIDTH: usize = 10;
pub const EMAIL_WIDTH: usize = 20;
pub const MARITAL_WIDTH: usize = 12;
