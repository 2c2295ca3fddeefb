// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and field rules for snowflow.
//!
//! This crate owns the vocabulary shared by every other crate: the entity
//! records, the categorical condition codes, optimistic concurrency
//! versions, and the field classifier that turns a sparse JSON update into
//! typed per-record changesets.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod fields;
mod patch;
mod types;
mod validation;
mod version;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use fields::{
    FieldGroup, ProductField, TestField, classify_product_update, classify_test_update,
};
pub use patch::{
    AirConditionsPatch, ProductPatch, RankingPatch, SnowConditionsPatch, TestFieldsPatch,
    TestPatch, TrackConditionsPatch,
};
pub use types::{
    AirConditions, Cloud, EntityKind, NaturalKey, Product, ProductStatus, ProductType, Ranking,
    SnowConditions, SnowHumidity, SnowType, TeamRole, Test, TestConditions, TrackConditions,
    TrackHardness, TrackType, Wind,
};
pub use validation::{
    MAX_COMMENT_LEN, MAX_EAN_LEN, MAX_LOCATION_LEN, MAX_NAME_LEN, MAX_TEMPERATURE,
    MIN_TEMPERATURE, validate_date, validate_distance, validate_ean, validate_humidity,
    validate_rank, validate_required_text, validate_temperature, validate_temperature_range,
    validate_text, validate_url,
};
pub use version::Version;
