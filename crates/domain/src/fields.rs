// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field classification.
//!
//! Callers address fields through one flat namespace. Names that would be
//! ambiguous across the conditions records carry a prefix (`ac_`, `sc_`)
//! and are translated back to the storage column of their group.
//!
//! The tables here are fixed at compile time. Unknown names are rejected
//! before any value is looked at.

use crate::error::DomainError;
use crate::patch::{ProductPatch, TestPatch};
use serde_json::{Map, Value};

/// The backing record a test field is written to.
///
/// The declaration order is the order in which sub-updates are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldGroup {
    AirConditions,
    SnowConditions,
    TrackConditions,
    Ranking,
    Test,
}

impl FieldGroup {
    /// All groups in application order.
    pub const ORDER: [Self; 5] = [
        Self::AirConditions,
        Self::SnowConditions,
        Self::TrackConditions,
        Self::Ranking,
        Self::Test,
    ];

    /// Human-readable name used in conflict messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AirConditions => "air conditions",
            Self::SnowConditions => "snow conditions",
            Self::TrackConditions => "track conditions",
            Self::Ranking => "test rankings",
            Self::Test => "test",
        }
    }

    /// Returns true for the groups whose rows carry a version column.
    #[must_use]
    pub const fn is_versioned(self) -> bool {
        matches!(self, Self::Ranking | Self::Test)
    }
}

impl std::fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A field a caller may change on a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestField {
    AcTemperature,
    AirHumidity,
    Wind,
    Cloud,
    ScTemperature,
    SnowType,
    SnowHumidity,
    TrackHardness,
    TrackType,
    Rank,
    DistanceBehind,
    IsRankPublic,
    Location,
    TestDate,
    Comment,
    IsPublic,
}

impl TestField {
    pub const ALL: [Self; 16] = [
        Self::AcTemperature,
        Self::AirHumidity,
        Self::Wind,
        Self::Cloud,
        Self::ScTemperature,
        Self::SnowType,
        Self::SnowHumidity,
        Self::TrackHardness,
        Self::TrackType,
        Self::Rank,
        Self::DistanceBehind,
        Self::IsRankPublic,
        Self::Location,
        Self::TestDate,
        Self::Comment,
        Self::IsPublic,
    ];

    /// The caller-facing name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AcTemperature => "ac_temperature",
            Self::AirHumidity => "air_humidity",
            Self::Wind => "wind",
            Self::Cloud => "cloud",
            Self::ScTemperature => "sc_temperature",
            Self::SnowType => "snow_type",
            Self::SnowHumidity => "snow_humidity",
            Self::TrackHardness => "track_hardness",
            Self::TrackType => "track_type",
            Self::Rank => "rank",
            Self::DistanceBehind => "distance_behind",
            Self::IsRankPublic => "is_rank_public",
            Self::Location => "location",
            Self::TestDate => "test_date",
            Self::Comment => "comment",
            Self::IsPublic => "is_public",
        }
    }

    #[must_use]
    pub const fn group(self) -> FieldGroup {
        match self {
            Self::AcTemperature | Self::AirHumidity | Self::Wind | Self::Cloud => {
                FieldGroup::AirConditions
            }
            Self::ScTemperature | Self::SnowType | Self::SnowHumidity => {
                FieldGroup::SnowConditions
            }
            Self::TrackHardness | Self::TrackType => FieldGroup::TrackConditions,
            Self::Rank | Self::DistanceBehind | Self::IsRankPublic => FieldGroup::Ranking,
            Self::Location | Self::TestDate | Self::Comment | Self::IsPublic => FieldGroup::Test,
        }
    }

    /// The storage column within the group's table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::AcTemperature | Self::ScTemperature => "temperature",
            Self::AirHumidity => "humidity",
            other => other.name(),
        }
    }

    /// Looks up a field by its caller-facing name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

/// A field a caller may change on a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    Brand,
    EanCode,
    ImageUrl,
    Comment,
    IsPublic,
    Type,
    HighTemperature,
    LowTemperature,
    Status,
}

impl ProductField {
    pub const ALL: [Self; 10] = [
        Self::Name,
        Self::Brand,
        Self::EanCode,
        Self::ImageUrl,
        Self::Comment,
        Self::IsPublic,
        Self::Type,
        Self::HighTemperature,
        Self::LowTemperature,
        Self::Status,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Brand => "brand",
            Self::EanCode => "ean_code",
            Self::ImageUrl => "image_url",
            Self::Comment => "comment",
            Self::IsPublic => "is_public",
            Self::Type => "type",
            Self::HighTemperature => "high_temperature",
            Self::LowTemperature => "low_temperature",
            Self::Status => "status",
        }
    }

    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Type => "product_type",
            other => other.name(),
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}

fn resolve_names<F>(
    updates: &Map<String, Value>,
    lookup: impl Fn(&str) -> Option<F>,
) -> Result<Vec<(F, &Value)>, DomainError> {
    updates
        .iter()
        .map(|(name, value)| {
            lookup(name)
                .map(|field| (field, value))
                .ok_or_else(|| DomainError::InvalidField(name.clone()))
        })
        .collect()
}

/// Partitions a sparse test update into typed per-group changesets.
///
/// # Errors
///
/// - `DomainError::InvalidField` naming the first unknown field
/// - `DomainError::InvalidFieldValue` if a value fails validation
/// - `DomainError::NoFieldsToUpdate` if every group is empty
pub fn classify_test_update(updates: &Map<String, Value>) -> Result<TestPatch, DomainError> {
    let fields: Vec<(TestField, &Value)> = resolve_names(updates, TestField::from_name)?;

    let mut patch: TestPatch = TestPatch::default();
    for (field, value) in fields {
        patch.set(field, value)?;
    }

    if patch.groups().is_empty() {
        return Err(DomainError::NoFieldsToUpdate);
    }
    Ok(patch)
}

/// Validates a sparse product update against the product allow-list.
///
/// # Errors
///
/// - `DomainError::InvalidField` naming the first unknown field
/// - `DomainError::InvalidFieldValue` if a value fails validation
/// - `DomainError::NoFieldsToUpdate` if the update is empty
pub fn classify_product_update(updates: &Map<String, Value>) -> Result<ProductPatch, DomainError> {
    let fields: Vec<(ProductField, &Value)> = resolve_names(updates, ProductField::from_name)?;
    if fields.is_empty() {
        return Err(DomainError::NoFieldsToUpdate);
    }

    let mut patch: ProductPatch = ProductPatch::default();
    for (field, value) in fields {
        patch.set(field, value)?;
    }
    Ok(patch)
}
