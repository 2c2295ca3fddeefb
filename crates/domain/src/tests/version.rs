// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, Version};
use time::macros::datetime;

#[test]
fn test_storage_form_is_fixed_width() {
    let version: Version = Version::from_datetime(datetime!(2026-01-15 08:30:05.1 UTC));
    assert_eq!(
        version.to_storage_string().unwrap(),
        "2026-01-15 08:30:05.100000"
    );
}

#[test]
fn test_sub_microsecond_digits_are_discarded() {
    let precise: Version = Version::from_datetime(datetime!(2026-01-15 08:30:05.123456789 UTC));
    let truncated: Version = Version::from_datetime(datetime!(2026-01-15 08:30:05.123456 UTC));
    assert_eq!(precise, truncated);
}

#[test]
fn test_parse_accepts_rfc3339_with_nanoseconds() {
    let from_client: Version = Version::parse("2026-01-15T08:30:05.123456789Z").unwrap();
    let stored: Version = Version::parse("2026-01-15 08:30:05.123456").unwrap();
    assert_eq!(from_client, stored);
}

#[test]
fn test_parse_normalizes_offsets_to_utc() {
    let local: Version = Version::parse("2026-01-15T09:30:05.5+01:00").unwrap();
    assert_eq!(local.to_storage_string().unwrap(), "2026-01-15 08:30:05.500000");
}

#[test]
fn test_parse_rejects_garbage() {
    match Version::parse("yesterday").unwrap_err() {
        DomainError::InvalidVersion { value, .. } => assert_eq!(value, "yesterday"),
        other => panic!("Expected InvalidVersion, got: {other:?}"),
    }
}

#[test]
fn test_successor_is_strictly_after() {
    let far_future: Version = Version::from_datetime(datetime!(2999-12-31 23:59:59.999999 UTC));
    let next: Version = far_future.successor();
    assert!(next.is_after(far_future));
}

#[test]
fn test_successor_of_past_version_is_now() {
    let old: Version = Version::from_datetime(datetime!(2020-01-01 00:00:00 UTC));
    let before: Version = Version::now();
    let next: Version = old.successor();
    assert!(!before.is_after(next));
}

#[test]
fn test_is_after_is_strict() {
    let version: Version = Version::from_datetime(datetime!(2026-01-15 08:30:05 UTC));
    assert!(!version.is_after(version));
}

#[test]
fn test_serde_uses_storage_form() {
    let version: Version = Version::from_datetime(datetime!(2026-03-01 12:00:00 UTC));
    let json: String = serde_json::to_string(&version).unwrap();
    assert_eq!(json, "\"2026-03-01 12:00:00.000000\"");
    let back: Version = serde_json::from_str(&json).unwrap();
    assert_eq!(back, version);
}
