//! Person record and its fixed-size codec

use std::fmt;
use std::str::FromStr;

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{CensusError, Result};

use super::{
    FixedText, EMAIL_WIDTH, MARITAL_WIDTH, NAMES_WIDTH, PHONE_WIDTH, RECORD_SIZE, REGION_WIDTH,
    SURNAMES_WIDTH,
};

/// Marital status, stored on disk as its Spanish name in a 12-byte field
///
/// The stored names (`Soltero`, `Casado`, `Divorciado`, `Viudo`) keep data
/// files interchangeable with the existing census tooling. English names are
/// accepted as aliases when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

impl MaritalStatus {
    /// Menu option (1-4) for this status
    pub fn option(&self) -> u8 {
        match self {
            MaritalStatus::Single => 1,
            MaritalStatus::Married => 2,
            MaritalStatus::Divorced => 3,
            MaritalStatus::Widowed => 4,
        }
    }

    /// Map a menu option (1-4) to a status
    pub fn from_option(option: u8) -> Option<Self> {
        match option {
            1 => Some(MaritalStatus::Single),
            2 => Some(MaritalStatus::Married),
            3 => Some(MaritalStatus::Divorced),
            4 => Some(MaritalStatus::Widowed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "Single",
            MaritalStatus::Married => "Married",
            MaritalStatus::Divorced => "Divorced",
            MaritalStatus::Widowed => "Widowed",
        }
    }

    /// Name written into the on-disk field
    pub fn stored_name(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "Soltero",
            MaritalStatus::Married => "Casado",
            MaritalStatus::Divorced => "Divorciado",
            MaritalStatus::Widowed => "Viudo",
        }
    }

    fn to_field(self) -> FixedText<MARITAL_WIDTH> {
        let mut buf = [0u8; MARITAL_WIDTH];
        let name = self.stored_name().as_bytes();
        buf[..name.len()].copy_from_slice(name);
        FixedText::from_bytes(buf)
    }
}

impl FromStr for MaritalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "soltero" | "single" => Ok(MaritalStatus::Single),
            "casado" | "married" => Ok(MaritalStatus::Married),
            "divorciado" | "divorced" => Ok(MaritalStatus::Divorced),
            "viudo" | "widowed" => Ok(MaritalStatus::Widowed),
            other => Err(format!("unknown marital status: {other}")),
        }
    }
}

impl fmt::Display for MaritalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person record with a stable 162-byte encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// National ID number (8 digits), unique across the store
    pub key: u32,
    pub first_names: FixedText<NAMES_WIDTH>,
    pub last_names: FixedText<SURNAMES_WIDTH>,
    pub department: FixedText<REGION_WIDTH>,
    pub province: FixedText<REGION_WIDTH>,
    pub city: FixedText<REGION_WIDTH>,
    pub district: FixedText<REGION_WIDTH>,
    pub location: FixedText<REGION_WIDTH>,
    pub phone: FixedText<PHONE_WIDTH>,
    pub email: FixedText<EMAIL_WIDTH>,
    pub marital_status: MaritalStatus,
    /// False once the record has been logically deleted
    pub active: bool,
}

impl Record {
    /// Encode into exactly `RECORD_SIZE` bytes
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(RECORD_SIZE);
        buf.put_u32_le(self.key);
        buf.put_slice(self.first_names.as_bytes());
        buf.put_slice(self.last_names.as_bytes());
        buf.put_slice(self.department.as_bytes());
        buf.put_slice(self.province.as_bytes());
        buf.put_slice(self.city.as_bytes());
        buf.put_slice(self.district.as_bytes());
        buf.put_slice(self.location.as_bytes());
        buf.put_slice(self.phone.as_bytes());
        buf.put_slice(self.email.as_bytes());
        buf.put_slice(self.marital_status.to_field().as_bytes());
        buf.put_u8(self.active as u8);
        debug_assert_eq!(buf.len(), RECORD_SIZE);
        buf
    }

    /// Decode a record read from `offset` in the data file
    ///
    /// `offset` is only used for error reporting.
    pub fn decode(mut bytes: &[u8], offset: u64) -> Result<Self> {
        if bytes.len() != RECORD_SIZE {
            return Err(corrupt(
                offset,
                format!("expected {} bytes, got {}", RECORD_SIZE, bytes.len()),
            ));
        }

        let key = bytes.get_u32_le();
        let first_names = take_text(&mut bytes, offset, "first_names")?;
        let last_names = take_text(&mut bytes, offset, "last_names")?;
        let department = take_text(&mut bytes, offset, "department")?;
        let province = take_text(&mut bytes, offset, "province")?;
        let city = take_text(&mut bytes, offset, "city")?;
        let district = take_text(&mut bytes, offset, "district")?;
        let location = take_text(&mut bytes, offset, "location")?;
        let phone = take_text(&mut bytes, offset, "phone")?;
        let email = take_text(&mut bytes, offset, "email")?;

        let marital: FixedText<MARITAL_WIDTH> = take_text(&mut bytes, offset, "marital_status")?;
        let marital_status = marital
            .as_str()
            .parse::<MaritalStatus>()
            .map_err(|e| corrupt(offset, e))?;

        let active = match bytes.get_u8() {
            0 => false,
            1 => true,
            other => return Err(corrupt(offset, format!("invalid active flag {other}"))),
        };

        Ok(Self {
            key,
            first_names,
            last_names,
            department,
            province,
            city,
            district,
            location,
            phone,
            email,
            marital_status,
            active,
        })
    }
}

fn take_text<const N: usize>(bytes: &mut &[u8], offset: u64, field: &str) -> Result<FixedText<N>> {
    let mut raw = [0u8; N];
    bytes.copy_to_slice(&mut raw);
    let text = FixedText::from_bytes(raw);
    if text.try_as_str().is_none() {
        return Err(corrupt(offset, format!("{field} is not valid UTF-8")));
    }
    Ok(text)
}

fn corrupt(offset: u64, reason: impl Into<String>) -> CensusError {
    CensusError::CorruptRecord {
        offset,
        reason: reason.into(),
    }
}
