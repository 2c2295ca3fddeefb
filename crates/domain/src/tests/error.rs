// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::DomainError;

#[test]
fn test_invalid_field_names_the_field() {
    let error: DomainError = DomainError::InvalidField(String::from("bogus_field"));
    assert_eq!(error.to_string(), "invalid field: bogus_field");
}

#[test]
fn test_no_fields_to_update_message() {
    assert_eq!(
        DomainError::NoFieldsToUpdate.to_string(),
        "no fields to update"
    );
}

#[test]
fn test_invalid_field_value_message() {
    let error: DomainError = DomainError::InvalidFieldValue {
        field: String::from("rank"),
        reason: String::from("must be greater than 0"),
    };
    assert_eq!(
        error.to_string(),
        "invalid value for rank: must be greater than 0"
    );
}

#[test]
fn test_temperature_range_message() {
    let error: DomainError = DomainError::InvalidTemperatureRange {
        low: String::from("5"),
        high: String::from("-5"),
    };
    assert!(error.to_string().contains("low_temperature (5)"));
    assert!(error.to_string().contains("high_temperature (-5)"));
}
