// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed changesets, one per backing record.
//!
//! A `None` field is left untouched by the write. A changeset with every
//! field `None` is empty and produces no statement.

use crate::error::DomainError;
use crate::fields::{FieldGroup, ProductField, TestField};
use crate::types::{
    Cloud, Product, ProductStatus, ProductType, SnowHumidity, SnowType, TrackHardness, TrackType,
    Wind,
};
use crate::validation::{
    MAX_COMMENT_LEN, MAX_LOCATION_LEN, MAX_NAME_LEN, parse_bool, parse_code, parse_date,
    parse_distance, parse_ean, parse_humidity, parse_rank, parse_required_text, parse_temperature,
    parse_text, parse_url,
};
use serde_json::Value;
use time::Date;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirConditionsPatch {
    pub temperature: Option<f64>,
    pub humidity: Option<i32>,
    pub wind: Option<Wind>,
    pub cloud: Option<Cloud>,
}

impl AirConditionsPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.humidity.is_none()
            && self.wind.is_none()
            && self.cloud.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnowConditionsPatch {
    pub temperature: Option<f64>,
    pub snow_type: Option<SnowType>,
    pub snow_humidity: Option<SnowHumidity>,
}

impl SnowConditionsPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.snow_type.is_none() && self.snow_humidity.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackConditionsPatch {
    pub track_hardness: Option<TrackHardness>,
    pub track_type: Option<TrackType>,
}

impl TrackConditionsPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.track_hardness.is_none() && self.track_type.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingPatch {
    pub rank: Option<i32>,
    pub distance_behind: Option<i32>,
    pub is_rank_public: Option<bool>,
}

impl RankingPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rank.is_none() && self.distance_behind.is_none() && self.is_rank_public.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestFieldsPatch {
    pub location: Option<String>,
    pub test_date: Option<Date>,
    pub comment: Option<String>,
    pub is_public: Option<bool>,
}

impl TestFieldsPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.test_date.is_none()
            && self.comment.is_none()
            && self.is_public.is_none()
    }
}

/// A classified test update: one changeset per field group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestPatch {
    pub air: AirConditionsPatch,
    pub snow: SnowConditionsPatch,
    pub track: TrackConditionsPatch,
    pub ranking: RankingPatch,
    pub test: TestFieldsPatch,
}

impl TestPatch {
    /// Records a validated value for `field` in its group's changeset.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFieldValue` if the value fails the
    /// field's validator.
    pub fn set(&mut self, field: TestField, value: &Value) -> Result<(), DomainError> {
        let name: &str = field.name();
        match field {
            TestField::AcTemperature => self.air.temperature = Some(parse_temperature(name, value)?),
            TestField::AirHumidity => self.air.humidity = Some(parse_humidity(name, value)?),
            TestField::Wind => self.air.wind = Some(parse_code(name, value)?),
            TestField::Cloud => self.air.cloud = Some(parse_code(name, value)?),
            TestField::ScTemperature => {
                self.snow.temperature = Some(parse_temperature(name, value)?);
            }
            TestField::SnowType => self.snow.snow_type = Some(parse_code(name, value)?),
            TestField::SnowHumidity => self.snow.snow_humidity = Some(parse_code(name, value)?),
            TestField::TrackHardness => {
                self.track.track_hardness = Some(parse_code(name, value)?);
            }
            TestField::TrackType => self.track.track_type = Some(parse_code(name, value)?),
            TestField::Rank => self.ranking.rank = Some(parse_rank(name, value)?),
            TestField::DistanceBehind => {
                self.ranking.distance_behind = Some(parse_distance(name, value)?);
            }
            TestField::IsRankPublic => self.ranking.is_rank_public = Some(parse_bool(name, value)?),
            TestField::Location => {
                self.test.location = Some(parse_required_text(name, value, MAX_LOCATION_LEN)?);
            }
            TestField::TestDate => self.test.test_date = Some(parse_date(name, value)?),
            TestField::Comment => {
                self.test.comment = Some(parse_text(name, value, MAX_COMMENT_LEN, false)?);
            }
            TestField::IsPublic => self.test.is_public = Some(parse_bool(name, value)?),
        }
        Ok(())
    }

    /// Returns the non-empty groups in application order.
    #[must_use]
    pub fn groups(&self) -> Vec<FieldGroup> {
        FieldGroup::ORDER
            .into_iter()
            .filter(|group| !self.is_group_empty(*group))
            .collect()
    }

    #[must_use]
    pub const fn is_group_empty(&self, group: FieldGroup) -> bool {
        match group {
            FieldGroup::AirConditions => self.air.is_empty(),
            FieldGroup::SnowConditions => self.snow.is_empty(),
            FieldGroup::TrackConditions => self.track.is_empty(),
            FieldGroup::Ranking => self.ranking.is_empty(),
            FieldGroup::Test => self.test.is_empty(),
        }
    }
}

/// A validated product update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub ean_code: Option<String>,
    pub image_url: Option<String>,
    pub comment: Option<String>,
    pub is_public: Option<bool>,
    pub product_type: Option<ProductType>,
    pub high_temperature: Option<f64>,
    pub low_temperature: Option<f64>,
    pub status: Option<ProductStatus>,
}

impl ProductPatch {
    /// Records a validated value for `field`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidFieldValue` if the value fails the
    /// field's validator.
    pub fn set(&mut self, field: ProductField, value: &Value) -> Result<(), DomainError> {
        let name: &str = field.name();
        match field {
            ProductField::Name => self.name = Some(parse_required_text(name, value, MAX_NAME_LEN)?),
            ProductField::Brand => {
                self.brand = Some(parse_required_text(name, value, MAX_NAME_LEN)?);
            }
            ProductField::EanCode => {
                self.ean_code = Some(parse_ean(name, value)?);
            }
            ProductField::ImageUrl => self.image_url = Some(parse_url(name, value)?),
            ProductField::Comment => {
                self.comment = Some(parse_text(name, value, MAX_COMMENT_LEN, false)?);
            }
            ProductField::IsPublic => self.is_public = Some(parse_bool(name, value)?),
            ProductField::Type => self.product_type = Some(parse_code(name, value)?),
            ProductField::HighTemperature => {
                self.high_temperature = Some(parse_temperature(name, value)?);
            }
            ProductField::LowTemperature => {
                self.low_temperature = Some(parse_temperature(name, value)?);
            }
            ProductField::Status => self.status = Some(parse_code(name, value)?),
        }
        Ok(())
    }

    /// Returns true if the update touches the product's natural key.
    #[must_use]
    pub const fn touches_natural_key(&self) -> bool {
        self.name.is_some() || self.ean_code.is_some()
    }

    /// Returns the product as it would read after this update.
    #[must_use]
    pub fn applied_to(&self, product: &Product) -> Product {
        Product {
            product_id: product.product_id,
            name: self.name.clone().unwrap_or_else(|| product.name.clone()),
            brand: self.brand.clone().unwrap_or_else(|| product.brand.clone()),
            ean_code: self
                .ean_code
                .clone()
                .unwrap_or_else(|| product.ean_code.clone()),
            image_url: self.image_url.clone().or_else(|| product.image_url.clone()),
            comment: self.comment.clone().or_else(|| product.comment.clone()),
            is_public: self.is_public.unwrap_or(product.is_public),
            product_type: self.product_type.unwrap_or(product.product_type),
            high_temperature: self.high_temperature.unwrap_or(product.high_temperature),
            low_temperature: self.low_temperature.unwrap_or(product.low_temperature),
            testing_team: product.testing_team,
            version: product.version,
            status: self.status.unwrap_or(product.status),
        }
    }
}
