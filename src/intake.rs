//! Record Intake
//!
//! Turns raw candidate fields into a validated [`Record`]. Performs no I/O
//! and knows nothing about the index; duplicate keys are the registry's
//! concern.

use thiserror::Error;

use crate::record::{FixedText, MaritalStatus, Record, MAX_KEY, MIN_KEY};

/// Why a candidate was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("key {0} is not an 8-digit number")]
    KeyOutOfRange(u32),

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} allows at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} may only contain letters and spaces")]
    NotAlphabetic { field: &'static str },

    #[error("phone must be 9 digits starting with 9")]
    Phone,

    #[error("email must look like [letters-digits]@g.com and stay under 20 characters")]
    Email,

    #[error("marital status must be an option between 1 and 4")]
    MaritalStatus,
}

/// Unvalidated input, as typed by a user or read from a form
#[derive(Debug, Clone, Default)]
pub struct CandidateFields {
    pub key: u32,
    pub first_names: String,
    pub last_names: String,
    pub department: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub location: String,
    pub phone: String,
    pub email: String,
    /// Menu option 1-4 (Single, Married, Divorced, Widowed)
    pub marital_option: u8,
}

/// Validate `candidate` and build an active record from it
pub fn submit(candidate: &CandidateFields) -> Result<Record, ValidationError> {
    if !(MIN_KEY..=MAX_KEY).contains(&candidate.key) {
        return Err(ValidationError::KeyOutOfRange(candidate.key));
    }

    let record = Record {
        key: candidate.key,
        first_names: alpha_field("first_names", &candidate.first_names)?,
        last_names: alpha_field("last_names", &candidate.last_names)?,
        department: alpha_field("department", &candidate.department)?,
        province: alpha_field("province", &candidate.province)?,
        city: alpha_field("city", &candidate.city)?,
        district: alpha_field("district", &candidate.district)?,
        location: alpha_field("location", &candidate.location)?,
        phone: phone_field(&candidate.phone)?,
        email: email_field(&candidate.email)?,
        marital_status: MaritalStatus::from_option(candidate.marital_option)
            .ok_or(ValidationError::MaritalStatus)?,
        active: true,
    };
    Ok(record)
}

fn alpha_field<const N: usize>(
    field: &'static str,
    text: &str,
) -> Result<FixedText<N>, ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if !text.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        return Err(ValidationError::NotAlphabetic { field });
    }
    FixedText::new(text).ok_or(ValidationError::TooLong {
        field,
        max: FixedText::<N>::MAX_LEN,
    })
}

fn phone_field<const N: usize>(text: &str) -> Result<FixedText<N>, ValidationError> {
    let valid = text.len() == 9
        && text.starts_with('9')
        && text.bytes().all(|b| b.is_ascii_digit());
    if !valid {
        return Err(ValidationError::Phone);
    }
    FixedText::new(text).ok_or(ValidationError::Phone)
}

fn email_field<const N: usize>(text: &str) -> Result<FixedText<N>, ValidationError> {
    let local = text.strip_suffix("@g.com").ok_or(ValidationError::Email)?;
    if local.is_empty() || !local.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ValidationError::Email);
    }
    FixedText::new(text).ok_or(ValidationError::Email)
}
