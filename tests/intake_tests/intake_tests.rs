//! Tests for record intake
//!
//! These tests verify:
//! - A well-formed candidate becomes an active record
//! - Each field rule rejects bad input with the matching error

use census_store::intake::{self, CandidateFields, ValidationError};
use census_store::record::MaritalStatus;

// =============================================================================
// Helper Functions
// =============================================================================

fn candidate() -> CandidateFields {
    CandidateFields {
        key: 12_345_678,
        first_names: "Maria Elena".to_string(),
        last_names: "Torres Vega".to_string(),
        department: "Lima".to_string(),
        province: "Lima".to_string(),
        city: "Lima".to_string(),
        district: "Miraflores".to_string(),
        location: "Larco".to_string(),
        phone: "987654321".to_string(),
        email: "maria12@g.com".to_string(),
        marital_option: 2,
    }
}

fn rejected(candidate: CandidateFields) -> ValidationError {
    intake::submit(&candidate).unwrap_err()
}

// =============================================================================
// Accepted Candidates
// =============================================================================

#[test]
fn test_valid_candidate_becomes_active_record() {
    let record = intake::submit(&candidate()).unwrap();

    assert_eq!(record.key, 12_345_678);
    assert_eq!(record.first_names.as_str(), "Maria Elena");
    assert_eq!(record.district.as_str(), "Miraflores");
    assert_eq!(record.phone.as_str(), "987654321");
    assert_eq!(record.email.as_str(), "maria12@g.com");
    assert_eq!(record.marital_status, MaritalStatus::Married);
    assert!(record.active);
}

#[test]
fn test_key_bounds_are_inclusive() {
    for key in [10_000_000, 99_999_999] {
        let mut c = candidate();
        c.key = key;
        assert_eq!(intake::submit(&c).unwrap().key, key);
    }
}

#[test]
fn test_every_marital_option() {
    for (option, status) in [
        (1, MaritalStatus::Single),
        (2, MaritalStatus::Married),
        (3, MaritalStatus::Divorced),
        (4, MaritalStatus::Widowed),
    ] {
        let mut c = candidate();
        c.marital_option = option;
        assert_eq!(intake::submit(&c).unwrap().marital_status, status);
    }
}

// =============================================================================
// Rejected Candidates
// =============================================================================

#[test]
fn test_key_out_of_range() {
    for key in [0, 9_999_999, 100_000_000] {
        let mut c = candidate();
        c.key = key;
        assert_eq!(rejected(c), ValidationError::KeyOutOfRange(key));
    }
}

#[test]
fn test_empty_text_field() {
    let mut c = candidate();
    c.city = String::new();
    assert_eq!(rejected(c), ValidationError::Empty { field: "city" });
}

#[test]
fn test_text_field_with_digits() {
    let mut c = candidate();
    c.last_names = "Torres 2".to_string();
    assert_eq!(
        rejected(c),
        ValidationError::NotAlphabetic {
            field: "last_names"
        }
    );
}

#[test]
fn test_text_field_too_long() {
    let mut c = candidate();
    c.first_names = "Maria Elena Victoria".to_string();
    assert_eq!(
        rejected(c),
        ValidationError::TooLong {
            field: "first_names",
            max: 19
        }
    );

    let mut c = candidate();
    c.department = "Madre de Dios X".to_string();
    assert_eq!(
        rejected(c),
        ValidationError::TooLong {
            field: "department",
            max: 14
        }
    );
}

#[test]
fn test_bad_phone() {
    for phone in ["887654321", "98765432", "9876543210", "98765432a", ""] {
        let mut c = candidate();
        c.phone = phone.to_string();
        assert_eq!(rejected(c), ValidationError::Phone, "phone {:?}", phone);
    }
}

#[test]
fn test_bad_email() {
    for email in [
        "maria12@gmail.com",
        "@g.com",
        "maria.12@g.com",
        "maria12",
        "abcdefghijklmn@g.com",
    ] {
        let mut c = candidate();
        c.email = email.to_string();
        assert_eq!(rejected(c), ValidationError::Email, "email {:?}", email);
    }
}

#[test]
fn test_bad_marital_option() {
    for option in [0, 5, 255] {
        let mut c = candidate();
        c.marital_option = option;
        assert_eq!(rejected(c), ValidationError::MaritalStatus);
    }
}

#[test]
fn test_key_is_checked_before_fields() {
    let c = CandidateFields {
        key: 5,
        ..CandidateFields::default()
    };
    assert_eq!(rejected(c), ValidationError::KeyOutOfRange(5));
}
