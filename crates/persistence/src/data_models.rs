// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row shapes and conversions between stored rows and domain records.
//!
//! Booleans are stored as integers (0/1), dates as `YYYY-MM-DD` text, and
//! versions in the fixed-width text form produced by `Version`.

use diesel::prelude::*;
use std::str::FromStr;
use time::Date;
use time::macros::format_description;

use snowflow_domain::{
    AirConditions, AirConditionsPatch, Cloud, DomainError, Product, ProductPatch, ProductStatus,
    ProductType, Ranking, RankingPatch, SnowConditions, SnowConditionsPatch, SnowHumidity,
    SnowType, Test, TestFieldsPatch, TrackConditions, TrackConditionsPatch, TrackHardness,
    TrackType, Version, Wind,
};

use crate::diesel_schema;
use crate::error::PersistenceError;

// ============================================================================
// Encoding helpers
// ============================================================================

pub(crate) const fn encode_bool(value: bool) -> i32 {
    if value { 1 } else { 0 }
}

pub(crate) fn encode_version(version: Version) -> Result<String, PersistenceError> {
    version
        .to_storage_string()
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

pub(crate) fn encode_date(date: Date) -> Result<String, PersistenceError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

fn decode_version(raw: &str) -> Result<Version, PersistenceError> {
    Version::parse(raw).map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

fn decode_date(raw: &str) -> Result<Date, PersistenceError> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map_err(|e| PersistenceError::SerializationError(format!("date '{raw}': {e}")))
}

fn decode_code<T>(raw: &str) -> Result<T, PersistenceError>
where
    T: FromStr<Err = DomainError>,
{
    T::from_str(raw).map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

// ============================================================================
// Public inputs for creation
// ============================================================================

/// Data for a new product. The store assigns the id and the first version.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub ean_code: String,
    pub image_url: Option<String>,
    pub comment: Option<String>,
    pub is_public: bool,
    pub product_type: ProductType,
    pub high_temperature: f64,
    pub low_temperature: f64,
    pub testing_team: i64,
    pub status: ProductStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAirConditions {
    pub temperature: f64,
    pub humidity: i32,
    pub wind: Wind,
    pub cloud: Cloud,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSnowConditions {
    pub temperature: f64,
    pub snow_type: SnowType,
    pub snow_humidity: SnowHumidity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrackConditions {
    pub track_hardness: TrackHardness,
    pub track_type: TrackType,
}

/// Data for a new test and the three conditions records it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTest {
    pub test_date: Date,
    pub location: String,
    pub comment: Option<String>,
    pub is_public: bool,
    pub testing_team: i64,
    pub air: NewAirConditions,
    pub snow: NewSnowConditions,
    pub track: NewTrackConditions,
}

// ============================================================================
// Query rows
// ============================================================================

#[derive(Queryable, Selectable)]
#[diesel(table_name = diesel_schema::products)]
pub(crate) struct ProductRow {
    product_id: i64,
    name: String,
    brand: String,
    ean_code: String,
    image_url: Option<String>,
    comment: Option<String>,
    is_public: i32,
    product_type: String,
    high_temperature: f64,
    low_temperature: f64,
    testing_team: i64,
    version: String,
    status: String,
}

impl ProductRow {
    pub(crate) fn into_domain(self) -> Result<Product, PersistenceError> {
        Ok(Product {
            product_id: self.product_id,
            name: self.name,
            brand: self.brand,
            ean_code: self.ean_code,
            image_url: self.image_url,
            comment: self.comment,
            is_public: self.is_public != 0,
            product_type: decode_code(&self.product_type)?,
            high_temperature: self.high_temperature,
            low_temperature: self.low_temperature,
            testing_team: self.testing_team,
            version: decode_version(&self.version)?,
            status: decode_code(&self.status)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = diesel_schema::tests)]
pub(crate) struct TestRow {
    test_id: i64,
    test_date: String,
    location: String,
    comment: Option<String>,
    is_public: i32,
    testing_team: i64,
    version: String,
    snow_conditions_id: i64,
    track_conditions_id: i64,
    air_conditions_id: i64,
}

impl TestRow {
    pub(crate) fn into_domain(self) -> Result<Test, PersistenceError> {
        Ok(Test {
            test_id: self.test_id,
            test_date: decode_date(&self.test_date)?,
            location: self.location,
            comment: self.comment,
            is_public: self.is_public != 0,
            testing_team: self.testing_team,
            version: decode_version(&self.version)?,
            snow_conditions_id: self.snow_conditions_id,
            track_conditions_id: self.track_conditions_id,
            air_conditions_id: self.air_conditions_id,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = diesel_schema::test_ranks)]
pub(crate) struct RankingRow {
    test_id: i64,
    product_id: i64,
    rank: i32,
    distance_behind: i32,
    is_rank_public: i32,
    version: String,
}

impl RankingRow {
    pub(crate) fn into_domain(self) -> Result<Ranking, PersistenceError> {
        Ok(Ranking {
            test_id: self.test_id,
            product_id: self.product_id,
            rank: self.rank,
            distance_behind: self.distance_behind,
            is_rank_public: self.is_rank_public != 0,
            version: decode_version(&self.version)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = diesel_schema::air_conditions)]
pub(crate) struct AirConditionsRow {
    air_conditions_id: i64,
    temperature: f64,
    humidity: i32,
    wind: String,
    cloud: String,
}

impl AirConditionsRow {
    pub(crate) fn into_domain(self) -> Result<AirConditions, PersistenceError> {
        Ok(AirConditions {
            air_conditions_id: self.air_conditions_id,
            temperature: self.temperature,
            humidity: self.humidity,
            wind: decode_code(&self.wind)?,
            cloud: decode_code(&self.cloud)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = diesel_schema::snow_conditions)]
pub(crate) struct SnowConditionsRow {
    snow_conditions_id: i64,
    temperature: f64,
    snow_type: String,
    snow_humidity: String,
}

impl SnowConditionsRow {
    pub(crate) fn into_domain(self) -> Result<SnowConditions, PersistenceError> {
        Ok(SnowConditions {
            snow_conditions_id: self.snow_conditions_id,
            temperature: self.temperature,
            snow_type: decode_code(&self.snow_type)?,
            snow_humidity: decode_code(&self.snow_humidity)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = diesel_schema::track_conditions)]
pub(crate) struct TrackConditionsRow {
    track_conditions_id: i64,
    track_hardness: String,
    track_type: String,
}

impl TrackConditionsRow {
    pub(crate) fn into_domain(self) -> Result<TrackConditions, PersistenceError> {
        Ok(TrackConditions {
            track_conditions_id: self.track_conditions_id,
            track_hardness: decode_code(&self.track_hardness)?,
            track_type: decode_code(&self.track_type)?,
        })
    }
}

// ============================================================================
// Insert rows
// ============================================================================

#[derive(Insertable)]
#[diesel(table_name = diesel_schema::products)]
pub(crate) struct NewProductRow<'a> {
    pub name: &'a str,
    pub brand: &'a str,
    pub ean_code: &'a str,
    pub image_url: Option<&'a str>,
    pub comment: Option<&'a str>,
    pub is_public: i32,
    pub product_type: &'static str,
    pub high_temperature: f64,
    pub low_temperature: f64,
    pub testing_team: i64,
    pub version: String,
    pub status: &'static str,
}

impl<'a> NewProductRow<'a> {
    pub(crate) fn new(product: &'a NewProduct, version: Version) -> Result<Self, PersistenceError> {
        Ok(Self {
            name: &product.name,
            brand: &product.brand,
            ean_code: &product.ean_code,
            image_url: product.image_url.as_deref(),
            comment: product.comment.as_deref(),
            is_public: encode_bool(product.is_public),
            product_type: product.product_type.as_str(),
            high_temperature: product.high_temperature,
            low_temperature: product.low_temperature,
            testing_team: product.testing_team,
            version: encode_version(version)?,
            status: product.status.as_str(),
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = diesel_schema::air_conditions)]
pub(crate) struct NewAirConditionsRow {
    pub temperature: f64,
    pub humidity: i32,
    pub wind: &'static str,
    pub cloud: &'static str,
}

impl From<&NewAirConditions> for NewAirConditionsRow {
    fn from(air: &NewAirConditions) -> Self {
        Self {
            temperature: air.temperature,
            humidity: air.humidity,
            wind: air.wind.as_str(),
            cloud: air.cloud.as_str(),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = diesel_schema::snow_conditions)]
pub(crate) struct NewSnowConditionsRow {
    pub temperature: f64,
    pub snow_type: &'static str,
    pub snow_humidity: &'static str,
}

impl From<&NewSnowConditions> for NewSnowConditionsRow {
    fn from(snow: &NewSnowConditions) -> Self {
        Self {
            temperature: snow.temperature,
            snow_type: snow.snow_type.as_str(),
            snow_humidity: snow.snow_humidity.as_str(),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = diesel_schema::track_conditions)]
pub(crate) struct NewTrackConditionsRow {
    pub track_hardness: &'static str,
    pub track_type: &'static str,
}

impl From<&NewTrackConditions> for NewTrackConditionsRow {
    fn from(track: &NewTrackConditions) -> Self {
        Self {
            track_hardness: track.track_hardness.as_str(),
            track_type: track.track_type.as_str(),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = diesel_schema::tests)]
pub(crate) struct NewTestRow<'a> {
    pub test_date: String,
    pub location: &'a str,
    pub comment: Option<&'a str>,
    pub is_public: i32,
    pub testing_team: i64,
    pub version: String,
    pub snow_conditions_id: i64,
    pub track_conditions_id: i64,
    pub air_conditions_id: i64,
}

#[derive(Insertable)]
#[diesel(table_name = diesel_schema::test_ranks)]
pub(crate) struct NewRankingRow {
    pub test_id: i64,
    pub product_id: i64,
    pub rank: i32,
    pub distance_behind: i32,
    pub is_rank_public: i32,
    pub version: String,
}

// ============================================================================
// Changesets
// ============================================================================
//
// `None` fields are skipped by Diesel, so each statement only names the
// columns the caller changed.

#[derive(AsChangeset)]
#[diesel(table_name = diesel_schema::air_conditions)]
pub(crate) struct AirConditionsChangeset {
    temperature: Option<f64>,
    humidity: Option<i32>,
    wind: Option<&'static str>,
    cloud: Option<&'static str>,
}

impl From<&AirConditionsPatch> for AirConditionsChangeset {
    fn from(patch: &AirConditionsPatch) -> Self {
        Self {
            temperature: patch.temperature,
            humidity: patch.humidity,
            wind: patch.wind.map(|w| w.as_str()),
            cloud: patch.cloud.map(|c| c.as_str()),
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = diesel_schema::snow_conditions)]
pub(crate) struct SnowConditionsChangeset {
    temperature: Option<f64>,
    snow_type: Option<&'static str>,
    snow_humidity: Option<&'static str>,
}

impl From<&SnowConditionsPatch> for SnowConditionsChangeset {
    fn from(patch: &SnowConditionsPatch) -> Self {
        Self {
            temperature: patch.temperature,
            snow_type: patch.snow_type.map(|t| t.as_str()),
            snow_humidity: patch.snow_humidity.map(|h| h.as_str()),
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = diesel_schema::track_conditions)]
pub(crate) struct TrackConditionsChangeset {
    track_hardness: Option<&'static str>,
    track_type: Option<&'static str>,
}

impl From<&TrackConditionsPatch> for TrackConditionsChangeset {
    fn from(patch: &TrackConditionsPatch) -> Self {
        Self {
            track_hardness: patch.track_hardness.map(|h| h.as_str()),
            track_type: patch.track_type.map(|t| t.as_str()),
        }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = diesel_schema::test_ranks)]
pub(crate) struct RankingChangeset {
    rank: Option<i32>,
    distance_behind: Option<i32>,
    is_rank_public: Option<i32>,
    version: String,
}

impl RankingChangeset {
    pub(crate) fn new(patch: &RankingPatch, version: Version) -> Result<Self, PersistenceError> {
        Ok(Self {
            rank: patch.rank,
            distance_behind: patch.distance_behind,
            is_rank_public: patch.is_rank_public.map(encode_bool),
            version: encode_version(version)?,
        })
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = diesel_schema::tests)]
pub(crate) struct TestChangeset<'a> {
    location: Option<&'a str>,
    test_date: Option<String>,
    comment: Option<&'a str>,
    is_public: Option<i32>,
    version: String,
}

impl<'a> TestChangeset<'a> {
    pub(crate) fn new(patch: &'a TestFieldsPatch, version: Version) -> Result<Self, PersistenceError> {
        Ok(Self {
            location: patch.location.as_deref(),
            test_date: patch.test_date.map(encode_date).transpose()?,
            comment: patch.comment.as_deref(),
            is_public: patch.is_public.map(encode_bool),
            version: encode_version(version)?,
        })
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = diesel_schema::products)]
pub(crate) struct ProductChangeset<'a> {
    name: Option<&'a str>,
    brand: Option<&'a str>,
    ean_code: Option<&'a str>,
    image_url: Option<&'a str>,
    comment: Option<&'a str>,
    is_public: Option<i32>,
    product_type: Option<&'static str>,
    high_temperature: Option<f64>,
    low_temperature: Option<f64>,
    status: Option<&'static str>,
    version: String,
}

impl<'a> ProductChangeset<'a> {
    pub(crate) fn new(patch: &'a ProductPatch, version: Version) -> Result<Self, PersistenceError> {
        Ok(Self {
            name: patch.name.as_deref(),
            brand: patch.brand.as_deref(),
            ean_code: patch.ean_code.as_deref(),
            image_url: patch.image_url.as_deref(),
            comment: patch.comment.as_deref(),
            is_public: patch.is_public.map(encode_bool),
            product_type: patch.product_type.map(|t| t.as_str()),
            high_temperature: patch.high_temperature,
            low_temperature: patch.low_temperature,
            status: patch.status.map(|s| s.as_str()),
            version: encode_version(version)?,
        })
    }
}
