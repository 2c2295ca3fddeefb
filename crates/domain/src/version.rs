// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Optimistic concurrency tokens.
//!
//! A version is a UTC instant truncated to microseconds, the precision the
//! store keeps. Versions are opaque to callers: they are compared, never
//! interpreted as business dates.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::DomainError;

/// Fixed-width storage form. Lexical order equals chronological order.
const STORAGE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]");

/// An optimistic concurrency token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(OffsetDateTime);

impl Version {
    /// Returns the current instant as a version.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(OffsetDateTime::now_utc())
    }

    /// Normalizes an instant to UTC with microsecond precision.
    #[must_use]
    pub fn from_datetime(at: OffsetDateTime) -> Self {
        let utc: OffsetDateTime = at.to_offset(UtcOffset::UTC);
        let truncated: u32 = utc.nanosecond() / 1_000 * 1_000;
        Self(utc.replace_nanosecond(truncated).unwrap_or(utc))
    }

    /// Parses a version from either RFC 3339 or the storage form.
    ///
    /// Sub-microsecond digits are discarded so that a token that went through
    /// a lossy serializer still compares equal to the stored one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidVersion` if neither form matches.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if let Ok(at) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(Self::from_datetime(at));
        }
        PrimitiveDateTime::parse(trimmed, STORAGE_FORMAT)
            .map(|at| Self::from_datetime(at.assume_utc()))
            .map_err(|e| DomainError::InvalidVersion {
                value: value.to_string(),
                error: e.to_string(),
            })
    }

    /// Mints the version that replaces `self` on a successful write.
    ///
    /// The result is the later of now and one microsecond after `self`, so a
    /// new version is always strictly after the one it replaces.
    #[must_use]
    pub fn successor(self) -> Self {
        let floor: Self = Self(self.0.saturating_add(Duration::microseconds(1)));
        Self::now().max(floor)
    }

    /// Returns true if this version is strictly after `other`.
    #[must_use]
    pub fn is_after(self, other: Self) -> bool {
        self.0 > other.0
    }

    /// Returns the underlying instant.
    #[must_use]
    pub const fn as_datetime(self) -> OffsetDateTime {
        self.0
    }

    /// Formats the version in its storage form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidVersion` if the instant cannot be
    /// represented (years outside 0..=9999).
    pub fn to_storage_string(self) -> Result<String, DomainError> {
        self.0
            .format(STORAGE_FORMAT)
            .map_err(|e| DomainError::InvalidVersion {
                value: self.0.to_string(),
                error: e.to_string(),
            })
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text: String = self.to_storage_string().map_err(|_| std::fmt::Error)?;
        f.write_str(&text)
    }
}

impl std::str::FromStr for Version {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text: String = self
            .to_storage_string()
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text: String = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}
