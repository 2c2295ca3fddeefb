// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::version::Version;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use time::Date;

/// Declares a closed set of short codes with string conversions.
///
/// Every generated type gets `as_str`, `ALL`, `FromStr` and `Display`, and
/// serializes as its code.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every allowed value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the stored code for this value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(DomainError::InvalidCode {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text: String = String::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

code_enum! {
    /// Physical form of a product.
    ProductType, "type" {
        Liquid => "liquid",
        Solid => "solid",
        Spray => "spray",
        Powder => "powder",
        Gel => "gel",
        Bundle => "bundle",
    }
}

code_enum! {
    /// Market status of a product.
    ProductStatus, "status" {
        Active => "active",
        Tested => "tested",
        Discontinued => "discontinued",
        Development => "development",
        Retired => "retired",
    }
}

code_enum! {
    /// Snow crystal classification.
    SnowType, "snow_type" {
        A1 => "A1",
        A2 => "A2",
        A3 => "A3",
        A4 => "A4",
        A5 => "A5",
        /// Fresh snow.
        Fs => "FS",
        /// New snow.
        Ns => "NS",
        In => "IN",
        It => "IT",
        /// Transformed.
        Tr => "TR",
    }
}

code_enum! {
    /// Snow moisture classification, dry to very wet.
    SnowHumidity, "snow_humidity" {
        Ds => "DS",
        W1 => "W1",
        W2 => "W2",
        W3 => "W3",
        W4 => "W4",
    }
}

code_enum! {
    /// Wind classification.
    Wind, "wind" {
        Still => "S",
        Light => "L",
        Moderate => "M",
        Strong => "ST",
    }
}

code_enum! {
    /// Cloud cover on a four step scale.
    Cloud, "cloud" {
        Level1 => "1",
        Level2 => "2",
        Level3 => "3",
        Level4 => "4",
    }
}

code_enum! {
    /// Track hardness, H1 being the softest.
    TrackHardness, "track_hardness" {
        H1 => "H1",
        H2 => "H2",
        H3 => "H3",
        H4 => "H4",
        H5 => "H5",
        H6 => "H6",
    }
}

code_enum! {
    /// Track preparation type.
    TrackType, "track_type" {
        T1 => "T1",
        T2 => "T2",
        D1 => "D1",
        D2 => "D2",
    }
}

/// A team member's role within their team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamRole {
    /// Full privileges over the team's entities.
    Official,
    /// Limited privileges: cannot publish or touch public entities.
    Researcher,
}

impl TeamRole {
    /// Converts a stored role code (1 = Official, 2 = Researcher).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTeamRole` for any other code.
    pub const fn from_code(code: i32) -> Result<Self, DomainError> {
        match code {
            1 => Ok(Self::Official),
            2 => Ok(Self::Researcher),
            other => Err(DomainError::InvalidTeamRole(other)),
        }
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Official => 1,
            Self::Researcher => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Official => "Official",
            Self::Researcher => "Researcher",
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kinds of entity a caller can patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Test,
    Product,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Product => "product",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The business key used to detect duplicate products.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NaturalKey {
    /// A non-blank EAN code.
    EanCode(String),
    /// The product name, used when the EAN code is blank.
    Name(String),
}

impl NaturalKey {
    /// Derives the key: the EAN code when non-blank, otherwise the name.
    #[must_use]
    pub fn derive(ean_code: &str, name: &str) -> Self {
        let ean_code: &str = ean_code.trim();
        if ean_code.is_empty() {
            Self::Name(name.to_string())
        } else {
            Self::EanCode(ean_code.to_string())
        }
    }
}

impl std::fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EanCode(ean) => write!(f, "ean_code '{ean}'"),
            Self::Name(name) => write!(f, "name '{name}'"),
        }
    }
}

/// A product that can be ranked in tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub brand: String,
    /// Blank when the product has no EAN code.
    pub ean_code: String,
    pub image_url: Option<String>,
    pub comment: Option<String>,
    pub is_public: bool,
    pub product_type: ProductType,
    pub high_temperature: f64,
    pub low_temperature: f64,
    pub testing_team: i64,
    pub version: Version,
    pub status: ProductStatus,
}

impl Product {
    /// Returns the product's current natural key.
    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey::derive(&self.ean_code, &self.name)
    }
}

/// A test session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    pub test_id: i64,
    pub test_date: Date,
    pub location: String,
    pub comment: Option<String>,
    pub is_public: bool,
    pub testing_team: i64,
    pub version: Version,
    pub snow_conditions_id: i64,
    pub track_conditions_id: i64,
    pub air_conditions_id: i64,
}

/// The placement of one product within one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub test_id: i64,
    pub product_id: i64,
    pub rank: i32,
    pub distance_behind: i32,
    pub is_rank_public: bool,
    pub version: Version,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirConditions {
    pub air_conditions_id: i64,
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: i32,
    pub wind: Wind,
    pub cloud: Cloud,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnowConditions {
    pub snow_conditions_id: i64,
    pub temperature: f64,
    pub snow_type: SnowType,
    pub snow_humidity: SnowHumidity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackConditions {
    pub track_conditions_id: i64,
    pub track_hardness: TrackHardness,
    pub track_type: TrackType,
}

/// The three conditions records owned by a test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestConditions {
    pub air: AirConditions,
    pub snow: SnowConditions,
    pub track: TrackConditions,
}
