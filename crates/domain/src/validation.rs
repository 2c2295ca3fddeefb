// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Value validators for caller-supplied field values.
//!
//! Each validator takes the caller-facing field name (used in error
//! messages) and a JSON value, and returns the typed value or a
//! `DomainError::InvalidFieldValue`.

use crate::error::DomainError;
use serde_json::Value;
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Lowest accepted temperature in degrees Celsius.
pub const MIN_TEMPERATURE: f64 = -100.0;
/// Highest accepted temperature in degrees Celsius.
pub const MAX_TEMPERATURE: f64 = 100.0;
/// Maximum length of a test location.
pub const MAX_LOCATION_LEN: usize = 256;
/// Maximum length of a free-text comment.
pub const MAX_COMMENT_LEN: usize = 2040;
/// Maximum length of a product name or brand.
pub const MAX_NAME_LEN: usize = 64;
/// Maximum length of an EAN code.
pub const MAX_EAN_LEN: usize = 128;

fn invalid(field: &str, reason: impl Into<String>) -> DomainError {
    DomainError::InvalidFieldValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Parses a boolean.
///
/// # Errors
///
/// Returns an error if the value is not a JSON boolean.
pub fn parse_bool(field: &str, value: &Value) -> Result<bool, DomainError> {
    value
        .as_bool()
        .ok_or_else(|| invalid(field, "expected a boolean"))
}

/// Checks that a temperature lies within the accepted range.
///
/// # Errors
///
/// Returns an error if the temperature is out of range.
pub fn validate_temperature(field: &str, temperature: f64) -> Result<f64, DomainError> {
    if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        return Err(invalid(
            field,
            format!("must be between {MIN_TEMPERATURE} and {MAX_TEMPERATURE}"),
        ));
    }
    Ok(temperature)
}

/// Parses a temperature within the accepted range.
///
/// # Errors
///
/// Returns an error if the value is not a number in range.
pub fn parse_temperature(field: &str, value: &Value) -> Result<f64, DomainError> {
    let temperature: f64 = value
        .as_f64()
        .ok_or_else(|| invalid(field, "expected a number"))?;
    validate_temperature(field, temperature)
}

fn parse_integer(field: &str, value: &Value) -> Result<i32, DomainError> {
    let raw: i64 = value
        .as_i64()
        .ok_or_else(|| invalid(field, "expected an integer"))?;
    i32::try_from(raw).map_err(|_| invalid(field, "integer out of range"))
}

/// Checks that a relative humidity is a percentage.
///
/// # Errors
///
/// Returns an error if the humidity is outside `0..=100`.
pub fn validate_humidity(field: &str, humidity: i32) -> Result<i32, DomainError> {
    if !(0..=100).contains(&humidity) {
        return Err(invalid(field, "must be between 0 and 100"));
    }
    Ok(humidity)
}

/// Parses a relative humidity percentage.
///
/// # Errors
///
/// Returns an error if the value is not an integer in `0..=100`.
pub fn parse_humidity(field: &str, value: &Value) -> Result<i32, DomainError> {
    validate_humidity(field, parse_integer(field, value)?)
}

/// Checks that a rank is positive.
///
/// # Errors
///
/// Returns an error if the rank is zero or negative.
pub fn validate_rank(field: &str, rank: i32) -> Result<i32, DomainError> {
    if rank <= 0 {
        return Err(invalid(field, "must be greater than 0"));
    }
    Ok(rank)
}

/// Parses a rank, which starts at 1.
///
/// # Errors
///
/// Returns an error if the value is not a positive integer.
pub fn parse_rank(field: &str, value: &Value) -> Result<i32, DomainError> {
    validate_rank(field, parse_integer(field, value)?)
}

/// Checks that a distance is not negative.
///
/// # Errors
///
/// Returns an error if the distance is negative.
pub fn validate_distance(field: &str, distance: i32) -> Result<i32, DomainError> {
    if distance < 0 {
        return Err(invalid(field, "must not be negative"));
    }
    Ok(distance)
}

/// Parses a non-negative distance.
///
/// # Errors
///
/// Returns an error if the value is not a non-negative integer.
pub fn parse_distance(field: &str, value: &Value) -> Result<i32, DomainError> {
    validate_distance(field, parse_integer(field, value)?)
}

fn as_text<'a>(field: &str, value: &'a Value) -> Result<&'a str, DomainError> {
    value
        .as_str()
        .ok_or_else(|| invalid(field, "expected a string"))
}

/// Checks a text value against a length limit and, optionally, ASCII.
///
/// # Errors
///
/// Returns an error if the text is too long, or contains non-ASCII
/// characters when `ascii_only` is set.
pub fn validate_text(
    field: &str,
    text: &str,
    max_len: usize,
    ascii_only: bool,
) -> Result<String, DomainError> {
    if text.chars().count() > max_len {
        return Err(invalid(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    if ascii_only && !text.is_ascii() {
        return Err(invalid(field, "must contain only ASCII characters"));
    }
    Ok(text.to_string())
}

/// Parses a text value no longer than `max_len` characters.
///
/// # Errors
///
/// Returns an error if the value is not a string, or fails
/// [`validate_text`].
pub fn parse_text(
    field: &str,
    value: &Value,
    max_len: usize,
    ascii_only: bool,
) -> Result<String, DomainError> {
    validate_text(field, as_text(field, value)?, max_len, ascii_only)
}

/// Checks a required ASCII text value.
///
/// # Errors
///
/// Returns an error under the same conditions as [`validate_text`], or if
/// the text is blank.
pub fn validate_required_text(
    field: &str,
    text: &str,
    max_len: usize,
) -> Result<String, DomainError> {
    if text.trim().is_empty() {
        return Err(invalid(field, "must not be blank"));
    }
    validate_text(field, text, max_len, true)
}

/// Parses a required, non-blank text value.
///
/// # Errors
///
/// Returns an error if the value is not a string, or fails
/// [`validate_required_text`].
pub fn parse_required_text(
    field: &str,
    value: &Value,
    max_len: usize,
) -> Result<String, DomainError> {
    validate_required_text(field, as_text(field, value)?, max_len)
}

/// Checks and normalizes an EAN code.
///
/// Surrounding whitespace is dropped, so a whitespace-only code is stored
/// blank and the product is keyed by its name.
///
/// # Errors
///
/// Returns an error if the trimmed code is too long or not ASCII.
pub fn validate_ean(field: &str, ean_code: &str) -> Result<String, DomainError> {
    validate_text(field, ean_code.trim(), MAX_EAN_LEN, true)
}

/// Parses an EAN code, see [`validate_ean`].
///
/// # Errors
///
/// Returns an error if the value is not a string, or fails
/// [`validate_ean`].
pub fn parse_ean(field: &str, value: &Value) -> Result<String, DomainError> {
    validate_ean(field, as_text(field, value)?)
}

/// Checks that a value is an absolute `http` or `https` URL.
///
/// # Errors
///
/// Returns an error if the text is not such a URL.
pub fn validate_url(field: &str, text: &str) -> Result<String, DomainError> {
    let host: Option<&str> = text
        .strip_prefix("https://")
        .or_else(|| text.strip_prefix("http://"));
    match host {
        Some(rest) if !rest.is_empty() && !rest.contains(char::is_whitespace) => {
            Ok(text.to_string())
        }
        _ => Err(invalid(field, "must be an http or https URL")),
    }
}

/// Parses an absolute `http` or `https` URL.
///
/// # Errors
///
/// Returns an error if the value is not a string holding such a URL.
pub fn parse_url(field: &str, value: &Value) -> Result<String, DomainError> {
    validate_url(field, as_text(field, value)?)
}

/// Parses a categorical code.
///
/// Integers are accepted and compared by their decimal form, so a cloud
/// level may be sent as `2` or `"2"`.
///
/// # Errors
///
/// Returns an error if the value is neither a string nor an integer, or is
/// not one of the allowed codes.
pub fn parse_code<T>(field: &str, value: &Value) -> Result<T, DomainError>
where
    T: FromStr<Err = DomainError>,
{
    let text: String = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_i64() => n.to_string(),
        _ => return Err(invalid(field, "expected a code")),
    };
    text.parse::<T>()
        .map_err(|e| invalid(field, e.to_string()))
}

/// Reads a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// # Errors
///
/// Returns an error if the text is in neither form.
pub fn validate_date(field: &str, text: &str) -> Result<Date, DomainError> {
    if let Ok(date) = Date::parse(text, format_description!("[year]-[month]-[day]")) {
        return Ok(date);
    }
    OffsetDateTime::parse(text, &Rfc3339)
        .map(OffsetDateTime::date)
        .map_err(|_| invalid(field, "expected YYYY-MM-DD or an RFC 3339 timestamp"))
}

/// Parses a calendar date, see [`validate_date`].
///
/// # Errors
///
/// Returns an error if the value is not a string in either form.
pub fn parse_date(field: &str, value: &Value) -> Result<Date, DomainError> {
    let text: &str = value
        .as_str()
        .ok_or_else(|| invalid(field, "expected a date string"))?;
    validate_date(field, text)
}

/// Checks that a product's low temperature is below its high temperature.
///
/// # Errors
///
/// Returns `DomainError::InvalidTemperatureRange` otherwise.
pub fn validate_temperature_range(low: f64, high: f64) -> Result<(), DomainError> {
    if low < high {
        Ok(())
    } else {
        Err(DomainError::InvalidTemperatureRange {
            low: low.to_string(),
            high: high.to_string(),
        })
    }
}
